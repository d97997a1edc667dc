//! Step dependency graph
//!
//! Edges are derived from each step's `dependencies`, so the declared
//! dependencies and the sorted order can never disagree. Linearization uses
//! Kahn's algorithm; whenever several steps are ready at once the smallest id
//! goes first, which makes the order reproducible for identical input.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{PlanError, Result};
use crate::step::UpgradeStep;

/// A graph of upgrade steps, built fresh for each plan
#[derive(Debug, Clone, Default)]
pub struct StepGraph {
    steps: BTreeMap<String, UpgradeStep>,
}

impl StepGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step; ids must be unique
    pub fn add_step(&mut self, step: UpgradeStep) -> Result<()> {
        if self.steps.contains_key(&step.id) {
            return Err(PlanError::DuplicateStep { id: step.id });
        }
        self.steps.insert(step.id.clone(), step);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Topologically sort the steps, assigning `order` from 0
    pub fn linearize(mut self) -> Result<Vec<UpgradeStep>> {
        let mut in_degree: BTreeMap<&str, usize> = BTreeMap::new();
        let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

        for (id, step) in &self.steps {
            in_degree.insert(id.as_str(), step.dependencies.len());
            for dependency in &step.dependencies {
                if !self.steps.contains_key(dependency) {
                    return Err(PlanError::DanglingDependency {
                        step: id.clone(),
                        dependency: dependency.clone(),
                    });
                }
                dependents
                    .entry(dependency.as_str())
                    .or_default()
                    .push(id.as_str());
            }
        }

        let mut ready: BTreeSet<&str> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(id, _)| *id)
            .collect();

        let mut sorted_ids: Vec<String> = Vec::with_capacity(self.steps.len());
        while let Some(current) = ready.pop_first() {
            sorted_ids.push(current.to_string());

            for dependent in dependents.get(current).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(*dependent);
                    }
                }
            }
        }

        if sorted_ids.len() != self.steps.len() {
            let remaining: Vec<String> = in_degree
                .iter()
                .filter(|(_, degree)| **degree > 0)
                .map(|(id, _)| id.to_string())
                .collect();
            return Err(PlanError::CycleDetected { remaining });
        }

        let mut ordered = Vec::with_capacity(sorted_ids.len());
        for (order, id) in sorted_ids.iter().enumerate() {
            if let Some(mut step) = self.steps.remove(id) {
                step.order = Some(order);
                ordered.push(step);
            }
        }

        Ok(ordered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::StepType;
    use kubeadvisor_analysis::ImpactLevel;

    fn step(id: &str, deps: &[&str]) -> UpgradeStep {
        let mut step = UpgradeStep::new(id, StepType::Precheck, ImpactLevel::Low, id);
        step.dependencies = deps.iter().map(|d| d.to_string()).collect();
        step
    }

    fn ids(steps: &[UpgradeStep]) -> Vec<&str> {
        steps.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_linear_chain() {
        let mut graph = StepGraph::new();
        graph.add_step(step("c", &["b"])).unwrap();
        graph.add_step(step("a", &[])).unwrap();
        graph.add_step(step("b", &["a"])).unwrap();

        let sorted = graph.linearize().unwrap();
        assert_eq!(ids(&sorted), vec!["a", "b", "c"]);
        assert_eq!(
            sorted.iter().map(|s| s.order).collect::<Vec<_>>(),
            vec![Some(0), Some(1), Some(2)]
        );
    }

    #[test]
    fn test_lexicographic_tie_break() {
        let mut graph = StepGraph::new();
        graph.add_step(step("root", &[])).unwrap();
        graph.add_step(step("zeta", &["root"])).unwrap();
        graph.add_step(step("alpha", &["root"])).unwrap();
        graph.add_step(step("mid", &["root"])).unwrap();
        graph
            .add_step(step("end", &["alpha", "mid", "zeta"]))
            .unwrap();

        let sorted = graph.linearize().unwrap();
        assert_eq!(ids(&sorted), vec!["root", "alpha", "mid", "zeta", "end"]);
    }

    #[test]
    fn test_newly_ready_steps_compete_with_waiting_ones() {
        // "b" becomes ready after "a" but still sorts before "x"
        let mut graph = StepGraph::new();
        graph.add_step(step("a", &[])).unwrap();
        graph.add_step(step("x", &[])).unwrap();
        graph.add_step(step("b", &["a"])).unwrap();

        let sorted = graph.linearize().unwrap();
        assert_eq!(ids(&sorted), vec!["a", "b", "x"]);
    }

    #[test]
    fn test_cycle_detected() {
        let mut graph = StepGraph::new();
        graph.add_step(step("start", &[])).unwrap();
        graph.add_step(step("a", &["start", "b"])).unwrap();
        graph.add_step(step("b", &["a"])).unwrap();

        let err = graph.linearize().unwrap_err();
        assert_eq!(
            err,
            PlanError::CycleDetected {
                remaining: vec!["a".to_string(), "b".to_string()],
            }
        );
        assert!(err.to_string().contains("cycle detected"));
    }

    #[test]
    fn test_dangling_dependency() {
        let mut graph = StepGraph::new();
        graph.add_step(step("a", &["ghost"])).unwrap();

        assert_eq!(
            graph.linearize().unwrap_err(),
            PlanError::DanglingDependency {
                step: "a".to_string(),
                dependency: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_step() {
        let mut graph = StepGraph::new();
        graph.add_step(step("a", &[])).unwrap();
        assert_eq!(
            graph.add_step(step("a", &[])).unwrap_err(),
            PlanError::DuplicateStep {
                id: "a".to_string(),
            }
        );
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_empty_graph() {
        assert!(StepGraph::new().linearize().unwrap().is_empty());
    }
}
