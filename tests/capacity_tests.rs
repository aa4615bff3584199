//! Buff capacity and display ordering through the effect list.

mod common;

use std::time::Duration;

use abnormal_engine::core::{EffectListConfig, SkillId, MAX_ACTIVATIONS};
use abnormal_engine::effects::{SkillCategory, SkillInfo, Stat, StatFunc};
use abnormal_engine::notify::OwnerMessage;
use common::{Harness, TestOwner};

fn fill_buffs(h: &Harness, n: u32) -> Vec<abnormal_engine::effects::EffectRef> {
    fill_from(h, 1..=n)
}

fn fill_from(
    h: &Harness,
    ids: std::ops::RangeInclusive<u32>,
) -> Vec<abnormal_engine::effects::EffectRef> {
    ids.map(|id| {
        let effect = h.buff(id);
        h.list.apply(effect.clone());
        effect
    })
    .collect()
}

// ============================================================================
// Plain buffs
// ============================================================================

/// The 21st buff on a 20-slot owner pushes out the earliest one.
#[test]
fn test_full_owner_evicts_earliest_buff() {
    let h = Harness::player();
    let buffs = fill_buffs(&h, 20);
    h.sink.take();

    let newcomer = h.buff(21);
    h.list.apply(newcomer.clone());

    assert_eq!(h.list.buff_count(), 20);
    assert!(buffs[0].is_exited());
    assert!(buffs[1..].iter().all(|e| e.in_use()));
    assert!(newcomer.in_use());
    assert_eq!(
        h.sink.messages(),
        vec![OwnerMessage::EffectDisappeared {
            skill_id: SkillId::new(1),
            level: 1
        }]
    );
}

/// A herb never pushes out a buff; it is refused when the slots are full.
#[test]
fn test_herb_refused_at_capacity() {
    let h = Harness::player();
    let buffs = fill_buffs(&h, 20);
    h.sink.take();

    let herb = h.effect(SkillInfo::buff(SkillId::new(900), 1)).herb().build();
    h.list.apply(herb.clone());

    assert!(herb.is_exited());
    assert_eq!(h.list.buff_count(), 20);
    assert!(buffs.iter().all(|e| e.in_use()));
    assert!(h.sink.messages().is_empty());
}

/// A herb with room to spare goes in like any buff.
#[test]
fn test_herb_admitted_with_room() {
    let h = Harness::player();
    fill_buffs(&h, 5);
    let herb = h.effect(SkillInfo::buff(SkillId::new(900), 1)).herb().build();
    h.list.apply(herb.clone());
    assert!(herb.in_use());
    assert_eq!(h.list.buff_count(), 6);
}

/// An owner with no slots refuses plain buffs outright.
#[test]
fn test_zero_slots_refuse_buffs() {
    let h = Harness::new(
        TestOwner::new(abnormal_engine::owner::OwnerKind::Player, 0),
        EffectListConfig::default(),
    );
    let buff = h.buff(1);
    h.list.apply(buff.clone());

    assert!(buff.is_exited());
    assert_eq!(h.list.buff_count(), 0);
}

/// Toggles and hidden effects never take a buff slot.
#[test]
fn test_toggles_and_hidden_effects_are_uncounted() {
    let h = Harness::player();
    let buffs = fill_buffs(&h, 20);

    let toggles: Vec<_> = (100..103)
        .map(|id| {
            let toggle = h.effect(SkillInfo::toggle(SkillId::new(id), 1)).build();
            h.list.apply(toggle.clone());
            toggle
        })
        .collect();
    let hidden = h
        .effect(SkillInfo::buff(SkillId::new(200), 1))
        .hidden_icon()
        .build();
    h.list.apply(hidden.clone());

    assert!(buffs.iter().all(|e| e.in_use()));
    assert!(toggles.iter().all(|e| e.in_use()));
    assert!(hidden.in_use());
    assert_eq!(h.list.buff_count(), 20);
    assert_eq!(h.list.all_buffs().len(), 24);
}

/// Buffs granting extra slots raise the owner's capacity.
#[test]
fn test_slot_stat_raises_capacity() {
    let h = Harness::player();
    let divine = h
        .effect(SkillInfo::buff(SkillId::new(1), 1))
        .stat(StatFunc::add(Stat::MaxBuffSlots, 4.0))
        .build();
    h.list.apply(divine.clone());
    let others: Vec<_> = (2..=24)
        .map(|id| {
            let effect = h.buff(id);
            h.list.apply(effect.clone());
            effect
        })
        .collect();

    assert_eq!(h.list.buff_count(), 24);
    assert!(divine.in_use());
    assert!(others.iter().all(|e| e.in_use()));

    // Pushing out the slot buff drops capacity back to 20 in the same batch.
    let one_more = h.buff(25);
    h.list.apply(one_more.clone());
    assert!(divine.is_exited());
    assert!(others[..4].iter().all(|e| e.is_exited()));
    assert!(others[4..].iter().all(|e| e.in_use()));
    assert!(one_more.in_use());
    assert_eq!(h.list.buff_count(), 20);
}

/// Losing slot-granting buffs evicts the earliest buffs down to the new
/// slot count.
#[test]
fn test_lost_slots_evict_earliest_buffs() {
    let h = Harness::new(
        TestOwner::new(abnormal_engine::owner::OwnerKind::Player, 3),
        EffectListConfig::default(),
    );
    let blessing = h
        .effect(SkillInfo::buff(SkillId::new(1), 1))
        .stat(StatFunc::add(Stat::MaxBuffSlots, 2.0))
        .build();
    h.list.apply(blessing.clone());
    let others = fill_from(&h, 2..=5);
    assert_eq!(h.list.buff_count(), 5);
    h.sink.take();

    h.list.exit(&blessing);

    assert_eq!(h.list.buff_count(), 3);
    assert!(others[0].is_exited());
    assert!(others[1..].iter().all(|e| e.in_use()));
    assert_eq!(
        h.sink.messages(),
        vec![
            OwnerMessage::EffectDisappeared {
                skill_id: SkillId::new(1),
                level: 1
            },
            OwnerMessage::EffectDisappeared {
                skill_id: SkillId::new(2),
                level: 1
            },
        ]
    );
    assert_eq!(h.sink.statuses().len(), 1);
}

// ============================================================================
// Dances and activations
// ============================================================================

/// The dance cap pushes out the earliest dance only.
#[test]
fn test_dance_cap() {
    let h = Harness::new(TestOwner::player(), EffectListConfig::default().with_dances_max(2));
    let plain = h.buff(1);
    h.list.apply(plain.clone());

    let dances: Vec<_> = (10..13)
        .map(|id| {
            let dance = h
                .effect(SkillInfo::dance(SkillId::new(id), 1))
                .duration(Duration::from_secs(120))
                .build();
            h.list.apply(dance.clone());
            dance
        })
        .collect();

    assert!(dances[0].is_exited());
    assert!(dances[1].in_use() && dances[2].in_use());
    assert!(plain.in_use());
    assert_eq!(h.list.dance_count(), 2);
    assert_eq!(h.list.buff_count(), 1);
}

/// Dormant dances do not count toward the dance cap.
#[test]
fn test_dormant_dances_are_uncounted() {
    let h = Harness::new(
        TestOwner::player(),
        EffectListConfig::default()
            .with_dances_max(2)
            .with_effect_canceling(false),
    );
    let dance = |id: u32| SkillInfo::dance(SkillId::new(id), 1);
    let strong = h.effect(dance(10)).stack_group("song").stack_level(2).build();
    let weak = h.effect(dance(11)).stack_group("song").stack_level(1).build();
    let other = h.effect(dance(12)).build();

    h.list.apply(strong.clone());
    h.list.apply(weak.clone());
    h.list.apply(other.clone());

    assert!(strong.in_use());
    assert!(!weak.in_use() && !weak.is_exited());
    assert!(other.in_use());
    assert_eq!(h.list.dance_count(), 2);
}

/// Activation-type effects have their own fixed cap.
#[test]
fn test_activation_cap() {
    let h = Harness::player();
    let count = MAX_ACTIVATIONS as u32 + 1;
    let activations: Vec<_> = (1..=count)
        .map(|id| {
            let effect = h.effect(SkillInfo::activation(SkillId::new(id), 1)).build();
            h.list.apply(effect.clone());
            effect
        })
        .collect();

    assert!(activations[0].is_exited());
    assert!(activations[1..].iter().all(|e| e.in_use()));
    assert_eq!(h.list.activation_count(), MAX_ACTIVATIONS);
    assert_eq!(h.list.buff_count(), 0);
}

// ============================================================================
// Display order
// ============================================================================

/// Buffs list by category regardless of arrival order.
#[test]
fn test_buffs_list_in_display_order() {
    let h = Harness::player();
    let arrivals = [
        SkillInfo::activation(SkillId::new(1), 1),
        SkillInfo::dance(SkillId::new(2), 1),
        SkillInfo::toggle(SkillId::new(3), 1),
        SkillInfo::seven_signs(SkillId::new(4), 1),
        SkillInfo::buff(SkillId::new(5), 1),
        SkillInfo::dance(SkillId::new(6), 1),
        SkillInfo::buff(SkillId::new(7), 1),
    ];
    for skill in arrivals {
        h.list.apply(h.effect(skill).build());
    }

    let categories: Vec<_> = h.list.all_buffs().iter().map(|e| e.category()).collect();
    assert_eq!(
        categories,
        vec![
            SkillCategory::Plain,
            SkillCategory::Plain,
            SkillCategory::SevenSigns,
            SkillCategory::Toggle,
            SkillCategory::Dance,
            SkillCategory::Dance,
            SkillCategory::Activation,
        ]
    );
    let skills: Vec<_> = h.list.all_buffs().iter().map(|e| e.skill().id.raw()).collect();
    assert_eq!(skills, vec![5, 7, 4, 3, 2, 6, 1]);

    let icons = &h.sink.statuses().last().cloned().unwrap_or_default().icons;
    let icon_skills: Vec<_> = icons.iter().map(|i| i.skill_id.raw()).collect();
    assert_eq!(icon_skills, skills);
}
