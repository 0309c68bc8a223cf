//! Full battle and simulator integration tests.

use std::sync::Arc;

use ether_battle::battle::{Battle, BattleView, CardPolicy, ComboPolicy, RandomPolicy, Winner};
use ether_battle::catalog::standard::{cards, enemies};
use ether_battle::catalog::{CardId, CardTrait, Catalog, EnemyDef, EnemyId, TokenId};
use ether_battle::combat::Stats;
use ether_battle::combo::AiMode;
use ether_battle::core::{BattleConfig, BattleEvent, BattleRng, CombatantId, Side};
use ether_battle::ether::GraceAbility;
use ether_battle::sim::{BalanceSimulator, SimConfig, StatKind};

fn setup(enemy: EnemyId, config: BattleConfig, seed: u64) -> (Battle, EnemyDef) {
    let catalog = Arc::new(Catalog::standard());
    let def = catalog.enemy(enemy).cloned().unwrap();
    (Battle::new(catalog, &def, config, BattleRng::new(seed)), def)
}

/// Commits nothing.
struct Pass;

impl CardPolicy for Pass {
    fn choose(&mut self, _view: &BattleView<'_>) -> Vec<usize> {
        Vec::new()
    }
}

/// Records whether the opponent's cards were visible.
#[derive(Default)]
struct Watcher {
    saw: Vec<bool>,
}

impl CardPolicy for Watcher {
    fn choose(&mut self, view: &BattleView<'_>) -> Vec<usize> {
        self.saw.push(view.revealed.is_some());
        Vec::new()
    }
}

/// Offers every card in hand; the driver keeps what fits the budget.
struct PlayAll;

impl CardPolicy for PlayAll {
    fn choose(&mut self, view: &BattleView<'_>) -> Vec<usize> {
        (0..view.hand.len()).collect()
    }
}

/// One-turn duel where each side's deck is a single repeated card, so
/// hands and queue order are fixed.
fn duel(mine: CardId, theirs: CardId, enemy_hp: i32, soul: u32) -> Battle {
    let enemy = EnemyDef::new(EnemyId(90), "Dummy")
        .with_unit("Dummy", enemy_hp, Stats::default())
        .with_deck(vec![theirs; 10])
        .with_soul(soul);
    Battle::new(Arc::new(Catalog::standard()), &enemy, BattleConfig::default(), BattleRng::new(1))
        .with_player_deck(&[mine; 5])
}

fn resolved_sides(battle: &Battle) -> Vec<Side> {
    battle
        .events()
        .iter()
        .filter_map(|e| match e {
            BattleEvent::CardResolved { actor, .. } if *actor == CombatantId::PLAYER => Some(Side::Player),
            BattleEvent::CardResolved { .. } => Some(Side::Opponent),
            _ => None,
        })
        .collect()
}

fn shifts(battle: &Battle) -> Vec<(CardId, CardTrait)> {
    battle
        .events()
        .iter()
        .filter_map(|e| match e {
            BattleEvent::TimelineShifted { card, effect } => Some((*card, *effect)),
            _ => None,
        })
        .collect()
}

// =============================================================================
// Battle flow
// =============================================================================

#[test]
fn test_every_encounter_finishes() {
    for enemy in [enemies::GOBLIN, enemies::WOLF_PACK, enemies::STONE_WARDEN] {
        for seed in 0..5 {
            let (mut battle, def) = setup(enemy, BattleConfig::default(), seed);
            let result = battle.run(&mut ComboPolicy::player(), &mut ComboPolicy::new(def.ai_mode));

            assert!(result.turns >= 1 && result.turns <= 30);
            assert_eq!(battle.winner(), Some(result.winner));
            let ended = battle
                .events()
                .iter()
                .filter(|e| matches!(e, BattleEvent::BattleEnded { .. }))
                .count();
            assert_eq!(ended, 1);
        }
    }
}

#[test]
fn test_hp_stays_in_range() {
    let (mut battle, _) = setup(enemies::WOLF_PACK, BattleConfig::default(), 17);
    let mut player = RandomPolicy::new(1);
    let mut opponent = RandomPolicy::new(2);

    while battle.play_turn(&mut player, &mut opponent).is_none() {
        for unit in battle.combatants().iter() {
            assert!(unit.hp >= 0 && unit.hp <= unit.max_hp);
            assert!(unit.block >= 0);
            assert!(unit.tokens.iter().all(|t| t.stacks() > 0));
        }
    }
}

#[test]
fn test_deck_cards_are_conserved() {
    let (mut battle, _) = setup(enemies::GOBLIN, BattleConfig::default().with_max_turns(6), 4);
    let player_total = battle.deck(Side::Player).total();
    let opponent_total = battle.deck(Side::Opponent).total();

    battle.run(&mut RandomPolicy::new(8), &mut RandomPolicy::new(9));

    assert_eq!(battle.deck(Side::Player).total(), player_total);
    assert_eq!(battle.deck(Side::Opponent).total(), opponent_total);
}

#[test]
fn test_insight_reveals_opponent_cards() {
    let (battle, _) = setup(enemies::GOBLIN, BattleConfig::default().with_max_turns(2), 1);
    let mut blind = Watcher::default();
    let mut sighted = Watcher::default();

    let mut plain = battle.clone();
    plain.run(&mut blind, &mut Pass);
    let mut wise = battle.with_player_stats(Stats::new(0, 0, 1));
    wise.run(&mut sighted, &mut Pass);

    assert_eq!(blind.saw, vec![false, false]);
    assert_eq!(sighted.saw, vec![true, true]);
}

#[test]
fn test_ether_victory() {
    let (mut battle, _) = setup(enemies::GOBLIN, BattleConfig::default(), 1);
    battle.ether_mut().opponent_soul = 0;

    assert_eq!(battle.play_turn(&mut Pass, &mut Pass), Some(Winner::Player));

    let (mut battle, _) = setup(enemies::GOBLIN, BattleConfig::default().with_ether_victory(false).with_max_turns(2), 1);
    battle.ether_mut().opponent_soul = 0;
    assert_eq!(battle.play_turn(&mut Pass, &mut Pass), None);
}

#[test]
fn test_player_death_loses() {
    let (mut battle, _) = setup(enemies::GOBLIN, BattleConfig::default(), 2);
    battle.combatants_mut().player_mut().hp = 1;

    let mut winner = None;
    while winner.is_none() {
        winner = battle.play_turn(&mut Pass, &mut ComboPolicy::new(AiMode::Aggressive));
    }

    assert_eq!(winner, Some(Winner::Opponent));
    assert!(battle
        .events()
        .iter()
        .any(|e| matches!(e, BattleEvent::UnitDefeated { unit } if *unit == CombatantId::PLAYER)));
}

#[test]
fn test_turn_tokens_cleared_between_turns() {
    let (mut battle, _) = setup(enemies::GOBLIN, BattleConfig::default(), 3);
    battle.inject_tokens(CombatantId::PLAYER, TokenId::Blur, 1);
    battle.inject_tokens(CombatantId::PLAYER, TokenId::Focus, 1);

    battle.play_turn(&mut Pass, &mut Pass);

    let tokens = &battle.combatants().player().tokens;
    assert!(!tokens.has(TokenId::Blur));
    assert!(tokens.has(TokenId::Focus));
}

#[test]
fn test_event_log_is_json() {
    let (mut battle, def) = setup(enemies::STONE_WARDEN, BattleConfig::default().with_max_turns(3), 5);
    battle.run(&mut ComboPolicy::player(), &mut ComboPolicy::new(def.ai_mode));

    for event in battle.events() {
        let json = serde_json::to_string(event).unwrap();
        let back: BattleEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, event);
        assert!(!event.to_string().is_empty());
    }
}

#[test]
fn test_custom_deck_falls_back_when_unplayable() {
    let (battle, _) = setup(enemies::GOBLIN, BattleConfig::default(), 1);

    let custom = battle.clone().with_player_deck(&[cards::SLASH, cards::GUARD]);
    assert_eq!(custom.deck(Side::Player).total(), 2);

    let broken = battle.with_player_deck(&[ether_battle::catalog::CardId::new(999)]);
    assert_eq!(broken.deck(Side::Player).total(), Catalog::standard().starter_deck().len());
}

// =============================================================================
// Card traits during resolution
// =============================================================================

use Side::{Opponent as O, Player as P};

#[test]
fn test_player_swift_pulls_own_cards_forward() {
    // Quickstep Cut 3 x5 / Claw 5 x5: unshifted order would be P O P P O P P O O O.
    let mut battle = duel(cards::QUICKSTEP_CUT, cards::CLAW, 500, 0);
    battle.play_turn(&mut PlayAll, &mut PlayAll);

    assert_eq!(resolved_sides(&battle), vec![P, P, P, O, P, P, O, O, O, O]);
    assert_eq!(shifts(&battle), vec![(cards::QUICKSTEP_CUT, CardTrait::Swift(2)); 5]);
}

#[test]
fn test_opponent_swift_pulls_its_cards_forward() {
    // Claw 5 x5 / Quickstep Cut 3 x5: unshifted order would be O P O O P O P O P P.
    let mut battle = duel(cards::CLAW, cards::QUICKSTEP_CUT, 500, 0);
    battle.play_turn(&mut PlayAll, &mut PlayAll);

    assert_eq!(resolved_sides(&battle), vec![O, O, P, O, O, O, P, P, P, P]);
    assert_eq!(shifts(&battle).len(), 5);
}

#[test]
fn test_player_stagger_pushes_enemy_back() {
    // Shove 4 x5 / Claw 5 x5: unshifted order would be P O P O P O P P O O.
    let mut battle = duel(cards::SHOVE, cards::CLAW, 500, 0);
    battle.play_turn(&mut PlayAll, &mut PlayAll);

    assert_eq!(resolved_sides(&battle), vec![P, P, O, P, P, P, O, O, O, O]);
    assert_eq!(shifts(&battle), vec![(cards::SHOVE, CardTrait::Stagger(3)); 5]);
}

#[test]
fn test_opponent_stagger_pushes_player_back() {
    // Claw 5 x5 / Shove 4 x5: unshifted order would be O P O P O P O P O P.
    let mut battle = duel(cards::CLAW, cards::SHOVE, 500, 0);
    battle.play_turn(&mut PlayAll, &mut PlayAll);

    assert_eq!(resolved_sides(&battle), vec![O, P, O, O, O, O, P, P, P, P]);
    assert_eq!(shifts(&battle), vec![(cards::SHOVE, CardTrait::Stagger(3)); 5]);
}

#[test]
fn test_knockback_moves_only_the_last_enemy_card() {
    // Kicks and claws both sit at 5, 10, 15, 20, 25; each kick pushes the final claw 5 later.
    let mut battle = duel(cards::KNOCKBACK_KICK, cards::CLAW, 500, 0);
    battle.play_turn(&mut PlayAll, &mut PlayAll);

    assert_eq!(resolved_sides(&battle), vec![P, O, P, O, P, O, P, O, P, O]);
    assert_eq!(shifts(&battle).len(), 5);
    let last = battle
        .events()
        .iter()
        .rev()
        .find_map(|e| match e {
            BattleEvent::CardResolved { actor, sp, .. } => Some((*actor, *sp)),
            _ => None,
        });
    assert_eq!(last, Some((CombatantId::PRIMARY_OPPONENT, 50)));
}

#[test]
fn test_knockback_from_opponent_is_ignored() {
    let mut battle = duel(cards::CLAW, cards::KNOCKBACK_KICK, 500, 0);
    battle.play_turn(&mut PlayAll, &mut PlayAll);

    assert!(shifts(&battle).is_empty());
}

#[test]
fn test_echo_duplicates_remaining_player_cards() {
    // Two Echo Chants fit the budget: P@10 and P@20 against claws up to 25.
    let mut battle = duel(cards::ECHO_CHANT, cards::CLAW, 500, 0);
    battle.play_turn(&mut PlayAll, &mut PlayAll);

    let duplicated: Vec<usize> = battle
        .events()
        .iter()
        .filter_map(|e| match e {
            BattleEvent::CardsDuplicated { count } => Some(*count),
            _ => None,
        })
        .collect();
    assert_eq!(duplicated, vec![1]);

    let last = battle.events().iter().rev().find_map(|e| match e {
        BattleEvent::CardResolved { actor, card, sp } => Some((*actor, *card, *sp)),
        _ => None,
    });
    assert_eq!(last, Some((CombatantId::PLAYER, cards::ECHO_CHANT, 26)));
}

#[test]
fn test_parry_collisions_cancel_both_cards() {
    // Parry 3 x5 / Howl 3 x5 meet at every position.
    let mut battle = duel(cards::PARRY, cards::HOWL, 500, 0);
    battle.play_turn(&mut PlayAll, &mut PlayAll);

    let collisions: Vec<i32> = battle
        .events()
        .iter()
        .filter_map(|e| match e {
            BattleEvent::EntriesCollided { sp, .. } => Some(*sp),
            _ => None,
        })
        .collect();
    assert_eq!(collisions, vec![3, 6, 9, 12, 15]);
    assert!(resolved_sides(&battle).is_empty());
}

// =============================================================================
// Ether settlement and grace
// =============================================================================

#[test]
fn test_overkill_becomes_player_tokens() {
    // Five Slashes: five of a kind, 50 points x5 = 250 against a pool of 10.
    let mut battle = duel(cards::SLASH, cards::CLAW, 500, 10);

    assert_eq!(battle.play_turn(&mut PlayAll, &mut Pass), Some(Winner::Player));

    let settled = battle.events().iter().find_map(|e| match e {
        BattleEvent::EtherSettled { moved, overkill, .. } => Some((*moved, *overkill)),
        _ => None,
    });
    assert_eq!(settled, Some((10, 240)));

    let reward = battle.events().iter().find_map(|e| match e {
        BattleEvent::OverkillRewarded { slots, tokens } => Some((*slots, tokens.clone())),
        _ => None,
    });
    let (slots, tokens) = reward.unwrap();
    assert_eq!(slots, 2);
    assert_eq!(tokens.len(), 2);
    assert_ne!(tokens[0].0, tokens[1].0);
    assert!(tokens.iter().all(|&(_, stacks)| stacks == 1));
    assert_eq!(battle.ether().soul, 10);
}

#[test]
fn test_defeated_opponent_pool_is_inherited() {
    let mut battle = duel(cards::SLASH, cards::CLAW, 10, 1000);

    assert_eq!(battle.play_turn(&mut PlayAll, &mut Pass), Some(Winner::Player));

    assert!(battle
        .events()
        .iter()
        .any(|e| *e == BattleEvent::SoulInherited { amount: 750 }));
    assert_eq!(battle.ether().soul, 1000);
    assert_eq!(battle.ether().opponent_soul, 0);
}

#[test]
fn test_mend_heals_wounded_opponent() {
    let (mut battle, _) = setup(enemies::GOBLIN, BattleConfig::default(), 1);
    battle.ether_mut().grace = 30;
    battle.combatants_mut().get_mut(CombatantId::PRIMARY_OPPONENT).unwrap().hp = 40;

    battle.play_turn(&mut Pass, &mut Pass);

    let events = battle.events();
    assert!(events.contains(&BattleEvent::Healed {
        target: CombatantId::PRIMARY_OPPONENT,
        amount: 10,
    }));
    assert!(events.contains(&BattleEvent::GraceAbilityUsed {
        ability: GraceAbility::Mend { cost: 30, heal: 10 },
        grace_left: 0,
    }));
    assert_eq!(battle.combatants().get(CombatantId::PRIMARY_OPPONENT).map(|u| u.hp), Some(50));
}

#[test]
fn test_mend_waits_for_real_wounds() {
    let (mut battle, _) = setup(enemies::GOBLIN, BattleConfig::default(), 1);
    battle.ether_mut().grace = 30;
    battle.combatants_mut().get_mut(CombatantId::PRIMARY_OPPONENT).unwrap().hp = 55;

    battle.play_turn(&mut Pass, &mut Pass);

    assert_eq!(battle.ether().grace, 30);
    assert!(!battle
        .events()
        .iter()
        .any(|e| matches!(e, BattleEvent::GraceAbilityUsed { .. })));
}

// =============================================================================
// Simulator
// =============================================================================

#[test]
fn test_simulator_counts_add_up() {
    let sim = BalanceSimulator::new(Arc::new(Catalog::standard()), SimConfig::default().with_battles(24));
    let warden = sim.encounter("stone warden").unwrap();

    let report = sim.run(&warden);

    assert_eq!(report.battles, 24);
    assert_eq!(report.wins + report.losses + report.draws, 24);
    assert!(!report.stopped);
    assert!(report.avg_turns >= 1.0);
    assert!(report.cards.iter().all(|c| c.battles_played <= 24));
    assert!(report.cards.windows(2).all(|w| w[0].card < w[1].card));
}

#[test]
fn test_simulator_matches_single_battles() {
    let sim = BalanceSimulator::new(
        Arc::new(Catalog::standard()),
        SimConfig::default().with_battles(6).with_seed_offset(100),
    );
    let goblin = sim.encounter("Goblin").unwrap();

    let report = sim.run(&goblin);
    let wins = (0..6).filter(|&i| sim.run_battle(&goblin, i).player_won()).count() as u32;

    assert_eq!(report.wins, wins);
}

#[test]
fn test_sweep_baseline_matches_run() {
    let sim = BalanceSimulator::new(Arc::new(Catalog::standard()), SimConfig::default().with_battles(8));
    let goblin = sim.encounter("Goblin").unwrap();

    let sweep = sim.sweep_stat(&goblin, StatKind::Agility, &[0, 3]);

    assert_eq!(sweep.stat, StatKind::Agility);
    assert!((sweep.baseline_win_rate - sim.run(&goblin).win_rate()).abs() < 1e-12);
    assert_eq!(sweep.points.iter().map(|p| p.value).collect::<Vec<_>>(), vec![0, 3]);
}
