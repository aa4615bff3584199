//! Stack-group conflict resolution.
//!
//! Effects that share a stack-group key compete for one slot. Members are
//! ranked by stack level (higher first, ties in arrival order) and only a
//! member that ranks first in *every* one of its groups may be in use.
//! Everyone else stays admitted but dormant, ready to be promoted when the
//! leader goes away.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use abnormal_engine::core::{EffectId, SkillId};
//! use abnormal_engine::effects::{Effect, SkillInfo};
//! use abnormal_engine::stack::StackGroups;
//!
//! let skill = Arc::new(SkillInfo::buff(SkillId::new(1086), 1));
//! let haste1 = Effect::builder(EffectId(1), Arc::clone(&skill))
//!     .stack_group("attack_time_down").stack_level(1).build();
//! let haste2 = Effect::builder(EffectId(2), skill)
//!     .stack_group("attack_time_down").stack_level(2).build();
//!
//! let mut groups = StackGroups::new();
//! groups.insert(&haste1, false);
//! groups.insert(&haste2, false);
//!
//! assert!(groups.is_first_in_all(&haste2));
//! assert_eq!(groups.withdraw(&haste2)[0].id(), EffectId(1));
//! ```

mod resolver;

pub use resolver::{StackGroups, StackList};
