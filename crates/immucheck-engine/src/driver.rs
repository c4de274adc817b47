//! # Traversal Driver
//!
//! Depth-first expansion of goals with an explicit visitation map. Every
//! goal identity (variant + symbol) moves through `InFlight` to a terminal
//! resolved state; popping a goal that is already `InFlight` or resolved
//! satisfied short-circuits to satisfied, which is what terminates traversal
//! on self- and mutually-referential type graphs. The first violation along
//! traversal order (base type before members, members in declaration order)
//! wins and stops sibling evaluation.

use std::collections::HashMap;

use anyhow::Result;
use immucheck_model::TypeId;
use tracing::debug;

use crate::goal::Goal;
use crate::graph::TypeGraph;
use crate::overrides::OverrideConfig;
use crate::rules::{Expansion, RuleSet};
use crate::verdict::{Inspection, TraceEntry, Verdict, Violation};
use crate::InspectFlags;

#[derive(Debug, Clone)]
enum VisitState {
    InFlight,
    Satisfied,
    Violated(Violation),
}

/// One root query. Owns its visitation map and trace; nothing is shared with
/// other queries.
pub struct Driver<'a> {
    graph: &'a dyn TypeGraph,
    rules: RuleSet<'a>,
    states: HashMap<Goal, VisitState>,
    /// Root type name followed by each member descended into.
    path: Vec<String>,
    trace: Vec<TraceEntry>,
}

impl<'a> Driver<'a> {
    pub fn new(
        graph: &'a dyn TypeGraph,
        overrides: &'a OverrideConfig,
        flags: InspectFlags,
    ) -> Self {
        Driver {
            graph,
            rules: RuleSet::new(graph, overrides, flags),
            states: HashMap::new(),
            path: Vec::new(),
            trace: Vec::new(),
        }
    }

    /// Run the query rooted at `root`. The root is inspected as a concrete
    /// type: the caller names a specific declaration, not a value of some
    /// broader static type.
    pub fn run(mut self, root: TypeId) -> Result<Inspection> {
        self.path.push(self.graph.type_name(root).to_string());
        let verdict = match self.solve(Goal::ConcreteType(root))? {
            None => Verdict::Satisfied,
            Some(violation) => Verdict::Violated(violation),
        };
        debug!(
            "inspected '{}': {} ({} goals applied)",
            self.graph.type_name(root),
            if verdict.is_satisfied() {
                "satisfied"
            } else {
                "violated"
            },
            self.trace.len()
        );
        Ok(Inspection {
            verdict,
            trace: self.trace,
        })
    }

    /// Returns `None` when the goal is satisfied, `Some` with the first
    /// violation otherwise.
    fn solve(&mut self, goal: Goal) -> Result<Option<Violation>> {
        if let Some(state) = self.states.get(&goal).cloned() {
            return match state {
                // Already being expanded further up the stack (a cycle in the
                // type graph) or proven before: nothing new to check.
                VisitState::InFlight | VisitState::Satisfied => {
                    self.record(goal, "revisit");
                    Ok(None)
                }
                VisitState::Violated(v) => Ok(Some(v)),
            };
        }
        self.states.insert(goal, VisitState::InFlight);

        let descended = match goal {
            Goal::Field(m) | Goal::Property(m) => {
                self.path.push(self.graph.member_name(m).to_string());
                true
            }
            _ => false,
        };

        let outcome = self.expand(goal);

        if descended {
            self.path.pop();
        }
        let outcome = outcome?;
        let terminal = match &outcome {
            None => VisitState::Satisfied,
            Some(v) => VisitState::Violated(v.clone()),
        };
        self.states.insert(goal, terminal);
        Ok(outcome)
    }

    fn expand(&mut self, goal: Goal) -> Result<Option<Violation>> {
        match self.rules.apply(goal)? {
            Expansion::Satisfied => {
                self.record(goal, "satisfied");
                Ok(None)
            }
            Expansion::Violated { cause, segment } => {
                self.record(goal, "violated");
                let mut path = self.path.clone();
                let symbol = match segment {
                    Some(seg) => {
                        path.push(seg.clone());
                        seg
                    }
                    None => self.goal_symbol(goal),
                };
                Ok(Some(Violation {
                    path,
                    symbol,
                    cause,
                }))
            }
            Expansion::Expand(goals) => {
                self.record(goal, &format!("expanded({})", goals.len()));
                for sub in goals {
                    if let Some(violation) = self.solve(sub)? {
                        // First violation wins; siblings are not evaluated.
                        return Ok(Some(violation));
                    }
                }
                Ok(None)
            }
        }
    }

    fn goal_symbol(&self, goal: Goal) -> String {
        match goal {
            Goal::Type(t)
            | Goal::ConcreteType(t)
            | Goal::Class(t)
            | Goal::Struct(t)
            | Goal::GenericParameter(t) => self.graph.type_name(t).to_string(),
            Goal::Field(m) | Goal::Property(m) | Goal::ReadOnly(m) => {
                self.graph.member_name(m).to_string()
            }
            Goal::Initializer { member, .. } => self.graph.member_name(member).to_string(),
        }
    }

    fn record(&mut self, goal: Goal, outcome: &str) {
        self.trace.push(TraceEntry {
            goal: goal.to_string(),
            symbol: self.goal_symbol(goal),
            outcome: outcome.to_string(),
        });
    }
}
