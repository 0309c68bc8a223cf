//! Built-in content set.
//!
//! Used by tests, benches and the simulator when no catalog file is given.

use super::card::{CardDef, CardId, CardTrait, GrantTarget, SpecialEffect};
use super::enemy::{EnemyDef, EnemyId};
use super::registry::{Catalog, CatalogData};
use super::token::{DurationClass, TokenCategory, TokenDef, TokenEffect, TokenId};
use crate::combat::Stats;
use crate::combo::AiMode;
use crate::ether::GraceAbility;

/// Card ids of the standard set.
pub mod cards {
    use super::CardId;

    pub const SLASH: CardId = CardId(1);
    pub const HEAVY_BLOW: CardId = CardId(2);
    pub const TWIN_FANG: CardId = CardId(3);
    pub const PIERCE: CardId = CardId(4);
    pub const SUNDER: CardId = CardId(5);
    pub const LONE_STRIKE: CardId = CardId(6);
    pub const QUICKSTEP_CUT: CardId = CardId(7);
    pub const GUILLOTINE: CardId = CardId(8);
    pub const FINISHER: CardId = CardId(9);
    pub const FLURRY: CardId = CardId(10);
    pub const EXPOSING_JAB: CardId = CardId(11);
    pub const LINGERING_EDGE: CardId = CardId(12);
    pub const SOUL_SIPHON: CardId = CardId(13);
    pub const PARRY: CardId = CardId(14);
    pub const GUARD: CardId = CardId(15);
    pub const BULWARK: CardId = CardId(16);
    pub const RALLY: CardId = CardId(17);
    pub const MEND: CardId = CardId(18);
    pub const HEX: CardId = CardId(19);
    pub const SIDESTEP: CardId = CardId(20);
    pub const SHOVE: CardId = CardId(21);
    pub const KNOCKBACK_KICK: CardId = CardId(22);
    pub const ECHO_CHANT: CardId = CardId(23);
    pub const FOCUS_BREATH: CardId = CardId(24);
    pub const JAM_SIGNAL: CardId = CardId(25);
    pub const WARD_SIGIL: CardId = CardId(26);

    pub const CLAW: CardId = CardId(40);
    pub const BITE: CardId = CardId(41);
    pub const HIDE: CardId = CardId(42);
    pub const HOWL: CardId = CardId(43);
    pub const CRUSH: CardId = CardId(44);
    pub const TAUNT: CardId = CardId(45);
}

/// Encounter ids of the standard set.
pub mod enemies {
    use super::EnemyId;

    pub const GOBLIN: EnemyId = EnemyId(1);
    pub const WOLF_PACK: EnemyId = EnemyId(2);
    pub const STONE_WARDEN: EnemyId = EnemyId(3);
}

fn tokens() -> Vec<TokenDef> {
    use DurationClass::{Permanent, Turn, Usage};
    use TokenCategory::{Negative, Positive};

    vec![
        TokenDef::new(TokenId::Attack, Usage, Positive, TokenEffect::Outgoing(1.5)).rewardable(),
        TokenDef::new(TokenId::Dull, Usage, Negative, TokenEffect::Outgoing(0.5)),
        TokenDef::new(TokenId::Defense, Usage, Positive, TokenEffect::BlockGain(1.5)).rewardable(),
        TokenDef::new(TokenId::Shaken, Usage, Negative, TokenEffect::BlockGain(0.5)),
        TokenDef::new(TokenId::Guarded, Usage, Positive, TokenEffect::Incoming(0.5)).rewardable(),
        TokenDef::new(TokenId::Vulnerable, Turn, Negative, TokenEffect::Incoming(1.5)),
        TokenDef::new(TokenId::Dodge, Usage, Positive, TokenEffect::Dodge(0.5)).rewardable(),
        TokenDef::new(TokenId::Blur, Turn, Positive, TokenEffect::Dodge(0.25)),
        TokenDef::new(TokenId::Counter, Turn, Positive, TokenEffect::Counter(3)).rewardable(),
        TokenDef::new(TokenId::Immunity, Permanent, Positive, TokenEffect::Immunity),
        TokenDef::new(TokenId::Focus, Permanent, Positive, TokenEffect::FlatDamage(1)).rewardable(),
        TokenDef::new(TokenId::Jammed, Turn, Negative, TokenEffect::Marker),
        TokenDef::new(TokenId::PersistentStrike, Turn, Positive, TokenEffect::FlatDamage(3)),
        TokenDef::new(TokenId::HalfEther, Usage, Negative, TokenEffect::EtherGain(0.5)),
    ]
}

fn player_cards() -> Vec<CardDef> {
    use self::cards::*;

    vec![
        CardDef::attack(SLASH, "Slash", 10).with_speed(4).with_cost(1),
        CardDef::attack(HEAVY_BLOW, "Heavy Blow", 18).with_speed(8).with_cost(2),
        CardDef::attack(TWIN_FANG, "Twin Fang", 5).with_hits(2).with_speed(5).with_cost(1),
        CardDef::attack(PIERCE, "Pierce", 9)
            .with_special(SpecialEffect::IgnoreBlock)
            .with_speed(6)
            .with_cost(2),
        CardDef::attack(SUNDER, "Sunder", 8)
            .with_special(SpecialEffect::ClearAllBlock)
            .with_speed(7)
            .with_cost(2),
        CardDef::attack(LONE_STRIKE, "Lone Strike", 9)
            .with_special(SpecialEffect::DoubleIfSoloAttack)
            .with_speed(5)
            .with_cost(2),
        CardDef::attack(QUICKSTEP_CUT, "Quickstep Cut", 6)
            .with_special(SpecialEffect::AgilityBonus)
            .with_trait(CardTrait::Swift(2))
            .with_speed(3)
            .with_cost(1),
        CardDef::attack(GUILLOTINE, "Guillotine", 12)
            .with_special(SpecialEffect::Execute)
            .with_speed(9)
            .with_cost(3),
        CardDef::attack(FINISHER, "Finisher", 7)
            .with_special(SpecialEffect::RepeatOnLastCard)
            .with_speed(6)
            .with_cost(2),
        CardDef::attack(FLURRY, "Flurry", 4)
            .with_special(SpecialEffect::RepeatPerUnusedAttack)
            .with_speed(5)
            .with_cost(2),
        CardDef::attack(EXPOSING_JAB, "Exposing Jab", 5)
            .with_special(SpecialEffect::VulnerableIfUnblocked)
            .with_speed(3)
            .with_cost(1),
        CardDef::attack(LINGERING_EDGE, "Lingering Edge", 7)
            .with_special(SpecialEffect::PersistentStrike)
            .with_speed(5)
            .with_cost(2),
        CardDef::attack(SOUL_SIPHON, "Soul Siphon", 6)
            .with_special(SpecialEffect::HalveEtherGain)
            .with_ether(20)
            .with_speed(6)
            .with_cost(2),
        CardDef::defense(PARRY, "Parry", 8)
            .with_trait(CardTrait::DestroyOnCollision)
            .with_speed(3)
            .with_cost(1),
        CardDef::defense(GUARD, "Guard", 12).with_speed(5).with_cost(1),
        CardDef::defense(BULWARK, "Bulwark", 20)
            .with_grant(TokenId::Counter, 1, GrantTarget::User)
            .with_speed(8)
            .with_cost(2),
        CardDef::support(RALLY, "Rally")
            .with_grant(TokenId::Attack, 1, GrantTarget::User)
            .with_speed(2)
            .with_cost(1),
        CardDef::support(MEND, "Mend").with_heal(12).with_speed(6).with_cost(2),
        CardDef::support(HEX, "Hex")
            .with_grant(TokenId::Dull, 1, GrantTarget::Target)
            .with_grant(TokenId::Shaken, 1, GrantTarget::Target)
            .with_speed(4)
            .with_cost(1),
        CardDef::support(SIDESTEP, "Sidestep")
            .with_grant(TokenId::Dodge, 1, GrantTarget::User)
            .with_speed(2)
            .with_cost(1),
        CardDef::attack(SHOVE, "Shove", 4)
            .with_trait(CardTrait::Stagger(3))
            .with_speed(4)
            .with_cost(1),
        CardDef::attack(KNOCKBACK_KICK, "Knockback Kick", 6)
            .with_trait(CardTrait::Knockback(5))
            .with_speed(5)
            .with_cost(1),
        CardDef::support(ECHO_CHANT, "Echo Chant")
            .with_trait(CardTrait::Echo)
            .with_speed(10)
            .with_cost(3),
        CardDef::support(FOCUS_BREATH, "Focus Breath")
            .with_grant(TokenId::Focus, 2, GrantTarget::User)
            .with_speed(3)
            .with_cost(1),
        CardDef::support(JAM_SIGNAL, "Jam Signal")
            .with_grant(TokenId::Jammed, 1, GrantTarget::Target)
            .with_speed(4)
            .with_cost(1),
        CardDef::support(WARD_SIGIL, "Ward Sigil")
            .with_grant(TokenId::Immunity, 1, GrantTarget::User)
            .with_speed(3)
            .with_cost(1),
    ]
}

fn enemy_cards() -> Vec<CardDef> {
    use self::cards::*;

    vec![
        CardDef::attack(CLAW, "Claw", 8).with_speed(5).with_cost(1),
        CardDef::attack(BITE, "Bite", 12).with_speed(7).with_cost(2),
        CardDef::defense(HIDE, "Hide", 10).with_speed(4).with_cost(1),
        CardDef::support(HOWL, "Howl")
            .with_grant(TokenId::Attack, 1, GrantTarget::User)
            .with_grant(TokenId::Vulnerable, 1, GrantTarget::Target)
            .with_speed(3)
            .with_cost(1),
        CardDef::attack(CRUSH, "Crush", 20).with_speed(10).with_cost(3),
        CardDef::support(TAUNT, "Taunt")
            .with_grant(TokenId::Guarded, 1, GrantTarget::User)
            .with_speed(3)
            .with_cost(1),
    ]
}

fn encounters() -> Vec<EnemyDef> {
    use self::cards::*;
    use self::enemies::*;

    vec![
        EnemyDef::new(GOBLIN, "Goblin")
            .with_unit("Goblin", 60, Stats::new(0, 1, 0))
            .with_deck([CLAW, CLAW, CLAW, CLAW, BITE, BITE, HIDE, HIDE, HOWL, HOWL])
            .with_soul(100)
            .with_ai_mode(AiMode::Aggressive)
            .with_grace_ability(GraceAbility::Mend { cost: 30, heal: 10 }),
        EnemyDef::new(WOLF_PACK, "Wolf Pack")
            .with_unit("Alpha Wolf", 30, Stats::new(1, 2, 0))
            .with_unit("Wolf", 22, Stats::new(0, 2, 0))
            .with_unit("Wolf", 22, Stats::new(0, 2, 0))
            .with_deck([CLAW, CLAW, CLAW, CLAW, CLAW, BITE, BITE, BITE, HOWL, HOWL])
            .with_soul(80)
            .with_ai_mode(AiMode::Aggressive),
        EnemyDef::new(STONE_WARDEN, "Stone Warden")
            .with_unit("Stone Warden", 120, Stats::new(2, 0, 1))
            .with_deck([CRUSH, CRUSH, HIDE, HIDE, HIDE, HIDE, BITE, BITE, TAUNT, TAUNT])
            .with_soul(200)
            .with_ai_mode(AiMode::Defensive)
            .with_grace_ability(GraceAbility::Ward { cost: 40, shield: 30 }),
    ]
}

fn starter_deck() -> Vec<CardId> {
    use self::cards::*;

    vec![
        SLASH,
        SLASH,
        SLASH,
        HEAVY_BLOW,
        TWIN_FANG,
        PIERCE,
        GUARD,
        GUARD,
        PARRY,
        RALLY,
        MEND,
        EXPOSING_JAB,
        LINGERING_EDGE,
        SOUL_SIPHON,
        SIDESTEP,
    ]
}

/// Raw data of the standard set, for callers that want to tweak it before
/// validation.
#[must_use]
pub fn standard_data() -> CatalogData {
    let mut cards = player_cards();
    cards.extend(enemy_cards());

    CatalogData {
        cards,
        tokens: tokens(),
        enemies: encounters(),
        opposites: vec![
            (TokenId::Attack, TokenId::Dull),
            (TokenId::Defense, TokenId::Shaken),
            (TokenId::Guarded, TokenId::Vulnerable),
        ],
        starter_deck: starter_deck(),
    }
}

impl Catalog {
    /// The built-in content set.
    #[must_use]
    pub fn standard() -> Self {
        match Self::from_data(standard_data()) {
            Ok(catalog) => catalog,
            Err(err) => unreachable!("standard catalog failed validation: {err}"),
        }
    }
}
