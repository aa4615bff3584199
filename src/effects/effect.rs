//! The effect entity: one active buff or debuff instance.
//!
//! Effects are shared as `EffectRef` (`Arc<Effect>`): the skill code that
//! created one, its timer, the mutation queue and a container slot may all
//! hold a reference at once. Identity and template data are immutable; the
//! in-use flag, elapsed time, lifecycle phase and timer handle are
//! interior-mutable so any holder can observe them.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use smallvec::SmallVec;

use crate::core::{CharId, EffectId, StackGroupKey};
use crate::flags::EffectFlags;
use crate::owner::{Scheduler, TimerHandle};

use super::{AbnormalType, EffectKind, SkillCategory, SkillInfo, StatFunc};

/// Shared handle to an effect.
pub type EffectRef = Arc<Effect>;

/// Lifecycle phase of an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EffectPhase {
    /// Created and possibly queued, not yet admitted to a container.
    Pending = 0,
    /// Admitted to a container.
    Active = 1,
    /// Removed, rejected or evicted. Never comes back.
    Exited = 2,
}

impl EffectPhase {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Pending,
            1 => Self::Active,
            _ => Self::Exited,
        }
    }
}

/// An active buff/debuff instance.
#[derive(Debug)]
pub struct Effect {
    id: EffectId,
    skill: Arc<SkillInfo>,
    abnormal_type: AbnormalType,
    stack_groups: SmallVec<[StackGroupKey; 2]>,
    stack_level: i32,
    duration: Option<Duration>,
    tick_interval: Option<Duration>,
    mask: EffectFlags,
    show_icon: bool,
    herb: bool,
    kind: EffectKind,
    stat_funcs: SmallVec<[StatFunc; 4]>,
    effector: Option<CharId>,

    in_use: AtomicBool,
    elapsed_ms: AtomicU64,
    phase: AtomicU8,
    timer_armed: AtomicBool,
    timer: Mutex<Option<TimerHandle>>,
}

impl Effect {
    /// Start building an effect for `skill`.
    pub fn builder(id: EffectId, skill: Arc<SkillInfo>) -> EffectBuilder {
        EffectBuilder::new(id, skill)
    }

    #[must_use]
    pub fn id(&self) -> EffectId {
        self.id
    }

    #[must_use]
    pub fn skill(&self) -> &SkillInfo {
        &self.skill
    }

    #[must_use]
    pub fn abnormal_type(&self) -> AbnormalType {
        self.abnormal_type
    }

    /// Stack groups this effect competes in. Empty means it always applies.
    #[must_use]
    pub fn stack_groups(&self) -> &[StackGroupKey] {
        &self.stack_groups
    }

    #[must_use]
    pub fn stack_level(&self) -> i32 {
        self.stack_level
    }

    /// Total duration; `None` lasts until removed.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Interval between timer firings: the tick interval, or the whole
    /// duration for effects that only fire once at expiry.
    #[must_use]
    pub fn tick_period(&self) -> Option<Duration> {
        self.tick_interval.or(self.duration).filter(|d| !d.is_zero())
    }

    #[must_use]
    pub fn mask(&self) -> EffectFlags {
        self.mask
    }

    #[must_use]
    pub fn show_icon(&self) -> bool {
        self.show_icon
    }

    /// Weak, consumable-granted effect that never pushes out another buff.
    #[must_use]
    pub fn is_herb(&self) -> bool {
        self.herb
    }

    #[must_use]
    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    #[must_use]
    pub fn stat_funcs(&self) -> &[StatFunc] {
        &self.stat_funcs
    }

    /// Character that applied the effect, when it matters to the hooks.
    #[must_use]
    pub fn effector(&self) -> Option<CharId> {
        self.effector
    }

    #[must_use]
    pub fn is_debuff(&self) -> bool {
        self.skill.debuff
    }

    #[must_use]
    pub fn category(&self) -> SkillCategory {
        self.skill.category
    }

    // === Mutable state ===

    /// Whether the effect currently contributes its stat functions.
    #[must_use]
    pub fn in_use(&self) -> bool {
        self.in_use.load(Ordering::Acquire)
    }

    /// Set the in-use flag, returning the previous value.
    pub fn set_in_use(&self, in_use: bool) -> bool {
        self.in_use.swap(in_use, Ordering::AcqRel)
    }

    /// Time the effect has been running.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms.load(Ordering::Acquire))
    }

    /// Advance elapsed time, returning the new total.
    pub fn advance(&self, by: Duration) -> Duration {
        let by_ms = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        let previous = self.elapsed_ms.fetch_add(by_ms, Ordering::AcqRel);
        Duration::from_millis(previous.saturating_add(by_ms))
    }

    /// Time left; `Duration::MAX` for effects without a duration.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        match self.duration {
            Some(total) => total.saturating_sub(self.elapsed()),
            None => Duration::MAX,
        }
    }

    /// The duration has run out.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.duration.is_some_and(|total| self.elapsed() >= total)
    }

    #[must_use]
    pub fn phase(&self) -> EffectPhase {
        EffectPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    #[must_use]
    pub fn is_exited(&self) -> bool {
        self.phase() == EffectPhase::Exited
    }

    /// Move from `Pending` to `Active`. Fails if the effect already exited.
    pub fn mark_active(&self) -> bool {
        self.phase
            .compare_exchange(
                EffectPhase::Pending as u8,
                EffectPhase::Active as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Move to `Exited`. Returns `true` only for the first caller.
    pub fn begin_exit(&self) -> bool {
        self.phase.swap(EffectPhase::Exited as u8, Ordering::AcqRel) != EffectPhase::Exited as u8
    }

    /// Claim the effect's timer chain. `true` only for the first caller.
    pub fn arm_timer(&self) -> bool {
        !self.timer_armed.swap(true, Ordering::AcqRel)
    }

    /// Remember the pending timer firing. Returns the handle it displaced,
    /// which the caller must cancel.
    #[must_use]
    pub fn set_timer(&self, handle: TimerHandle) -> Option<TimerHandle> {
        self.timer.lock().replace(handle)
    }

    /// Forget the pending timer firing without cancelling it.
    pub fn clear_timer(&self) {
        self.timer.lock().take();
    }

    /// Cancel the pending timer firing, if any.
    pub fn stop_timer(&self, scheduler: &dyn Scheduler) {
        if let Some(handle) = self.timer.lock().take() {
            scheduler.cancel(handle);
        }
    }

    // === Admission predicates ===

    /// Same skill, abnormal type, stack level and stack groups.
    #[must_use]
    pub fn same_signature(&self, other: &Effect) -> bool {
        self.skill.id == other.skill.id
            && self.abnormal_type == other.abnormal_type
            && self.stack_level == other.stack_level
            && self.stack_groups == other.stack_groups
    }

    /// Occupies one of the owner's regular buff slots.
    #[must_use]
    pub fn occupies_buff_slot(&self) -> bool {
        self.show_icon
            && self.skill.category == SkillCategory::Plain
            && !self.skill.debuff
            && self.skill.skill_type.occupies_buff_slot()
    }

    /// A hit of `damage` removes this effect.
    #[must_use]
    pub fn is_removed_on_damage(&self, damage: u32) -> bool {
        self.skill
            .removed_on_damage
            .is_some_and(|removal| damage >= removal.threshold)
    }

    /// Remaining seconds as shown on icons; `-1` for toggles and effects
    /// without a duration.
    #[must_use]
    pub fn icon_remaining_secs(&self) -> i32 {
        if self.skill.is_toggle() || self.duration.is_none() {
            return -1;
        }
        i32::try_from(self.remaining().as_secs()).unwrap_or(i32::MAX)
    }
}

impl PartialEq for Effect {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Effect {}

/// Builder for [`Effect`].
#[derive(Clone, Debug)]
pub struct EffectBuilder {
    id: EffectId,
    skill: Arc<SkillInfo>,
    abnormal_type: AbnormalType,
    stack_groups: SmallVec<[StackGroupKey; 2]>,
    stack_level: i32,
    duration: Option<Duration>,
    tick_interval: Option<Duration>,
    mask: EffectFlags,
    show_icon: bool,
    herb: bool,
    kind: EffectKind,
    stat_funcs: SmallVec<[StatFunc; 4]>,
    effector: Option<CharId>,
}

impl EffectBuilder {
    fn new(id: EffectId, skill: Arc<SkillInfo>) -> Self {
        let (abnormal_type, kind) = if skill.debuff {
            (AbnormalType::Debuff, EffectKind::Debuff)
        } else if skill.is_toggle() {
            (AbnormalType::Buff, EffectKind::Toggle { mp_per_tick: 0 })
        } else {
            (AbnormalType::Buff, EffectKind::Buff)
        };

        Self {
            id,
            skill,
            abnormal_type,
            stack_groups: SmallVec::new(),
            stack_level: 0,
            duration: None,
            tick_interval: None,
            mask: EffectFlags::NONE,
            show_icon: true,
            herb: false,
            kind,
            stat_funcs: SmallVec::new(),
            effector: None,
        }
    }

    #[must_use]
    pub fn abnormal_type(mut self, abnormal_type: AbnormalType) -> Self {
        self.abnormal_type = abnormal_type;
        self
    }

    /// Join a stack group. Duplicate keys are ignored.
    #[must_use]
    pub fn stack_group(mut self, key: impl Into<StackGroupKey>) -> Self {
        let key = key.into();
        if !self.stack_groups.contains(&key) {
            self.stack_groups.push(key);
        }
        self
    }

    #[must_use]
    pub fn stack_level(mut self, level: i32) -> Self {
        self.stack_level = level;
        self
    }

    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = Some(interval);
        self
    }

    #[must_use]
    pub fn mask(mut self, mask: EffectFlags) -> Self {
        self.mask = mask;
        self
    }

    #[must_use]
    pub fn hidden_icon(mut self) -> Self {
        self.show_icon = false;
        self
    }

    #[must_use]
    pub fn herb(mut self) -> Self {
        self.herb = true;
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: EffectKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn stat(mut self, func: StatFunc) -> Self {
        self.stat_funcs.push(func);
        self
    }

    #[must_use]
    pub fn effector(mut self, effector: CharId) -> Self {
        self.effector = Some(effector);
        self
    }

    /// Finish the effect. It starts `Pending`, dormant, with no elapsed time.
    #[must_use]
    pub fn build(self) -> EffectRef {
        Arc::new(Effect {
            id: self.id,
            skill: self.skill,
            abnormal_type: self.abnormal_type,
            stack_groups: self.stack_groups,
            stack_level: self.stack_level,
            duration: self.duration,
            tick_interval: self.tick_interval,
            mask: self.mask,
            show_icon: self.show_icon,
            herb: self.herb,
            kind: self.kind,
            stat_funcs: self.stat_funcs,
            effector: self.effector,
            in_use: AtomicBool::new(false),
            elapsed_ms: AtomicU64::new(0),
            phase: AtomicU8::new(EffectPhase::Pending as u8),
            timer_armed: AtomicBool::new(false),
            timer: Mutex::new(None),
        })
    }
}
