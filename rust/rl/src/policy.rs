use crate::episode::Trajectory;
use gymnasium::{Action, Discrete};
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt;

/// Result of asking a [`Policy`] for the action in a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Found(Action),
    Missing,
}

/// A deterministic policy that is only defined on the states it was built
/// from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    actions: BTreeMap<Discrete, Action>,
}

impl Policy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `states[i]` to `actions[i]`. A state visited more than once keeps
    /// the action taken on its last visit. The trailing state has no action
    /// and is skipped.
    pub fn from_trajectory(states: &[Discrete], actions: &[Action]) -> Self {
        let mut policy = Self::new();
        for (&s, &a) in states.iter().zip(actions) {
            policy.insert(s, a);
        }

        policy
    }

    pub fn insert(&mut self, state: Discrete, action: Action) -> Option<Action> {
        self.actions.insert(state, action)
    }

    pub fn lookup(&self, state: Discrete) -> Lookup {
        match self.actions.get(&state) {
            Some(&a) => Lookup::Found(a),
            None => Lookup::Missing,
        }
    }

    pub fn contains(&self, state: Discrete) -> bool {
        self.actions.contains_key(&state)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Discrete, Action)> + '_ {
        self.actions.iter().map(|(&s, &a)| (s, a))
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.iter().map(|(s, a)| format!("{s}: {a}")).join(", ")
        )
    }
}

pub fn extract_policy(trajectory: &Trajectory) -> Policy {
    Policy::from_trajectory(trajectory.states(), trajectory.actions())
}
