use serde::Serialize;

use crate::parallel::Strategy;

/// One permuted group: each concurrent strategy runs once, back-to-back, in `order`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialGroup {
    /// 1-based position within the plan
    pub number: usize,
    pub order: [Strategy; 3],
}

impl TrialGroup {
    /// Column header, e.g. `3(a->m->t)`
    pub fn label(&self) -> String {
        let codes: Vec<String> = self.order.iter().map(|s| s.code().to_string()).collect();
        format!("{}({})", self.number, codes.join("->"))
    }

    /// Full strategy names, e.g. `async -> multiprocessing -> threading`
    pub fn describe(&self) -> String {
        let names: Vec<String> = self.order.iter().map(Strategy::to_string).collect();
        names.join(" -> ")
    }
}

/// One entry of the flattened trial schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduledTrial {
    pub ordinal: usize,
    /// Owning group number; `None` for the sequential baselines
    pub group: Option<usize>,
    pub strategy: Strategy,
}

/// The benchmark schedule: a sequential baseline, the permuted groups, and a
/// closing sequential baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    groups: Vec<TrialGroup>,
}

impl RunPlan {
    /// The fixed seven-group schedule; groups 1 and 2 share an ordering
    pub fn standard() -> Self {
        use Strategy::{CooperativeAsync as A, Multiprocess as M, Threaded as T};

        let orders = [
            [A, T, M],
            [A, T, M],
            [A, M, T],
            [T, A, M],
            [T, M, A],
            [M, A, T],
            [M, T, A],
        ];

        let groups = orders
            .into_iter()
            .enumerate()
            .map(|(index, order)| TrialGroup {
                number: index + 1,
                order,
            })
            .collect();

        Self { groups }
    }

    pub fn groups(&self) -> &[TrialGroup] {
        &self.groups
    }

    pub fn labels(&self) -> Vec<String> {
        self.groups.iter().map(TrialGroup::label).collect()
    }

    /// Number of timed trials, baselines included
    pub fn trial_count(&self) -> usize {
        2 + self.groups.iter().map(|g| g.order.len()).sum::<usize>()
    }

    /// Every trial in execution order
    pub fn schedule(&self) -> Vec<ScheduledTrial> {
        let baseline = |ordinal| ScheduledTrial {
            ordinal,
            group: None,
            strategy: Strategy::Sequential,
        };

        let mut trials = vec![baseline(0)];
        for group in &self.groups {
            for strategy in group.order {
                trials.push(ScheduledTrial {
                    ordinal: trials.len(),
                    group: Some(group.number),
                    strategy,
                });
            }
        }
        trials.push(baseline(trials.len()));
        trials
    }
}

impl Default for RunPlan {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_plan_labels() {
        let labels = RunPlan::standard().labels();
        assert_eq!(
            labels,
            vec![
                "1(a->t->m)",
                "2(a->t->m)",
                "3(a->m->t)",
                "4(t->a->m)",
                "5(t->m->a)",
                "6(m->a->t)",
                "7(m->t->a)",
            ]
        );
    }

    #[test]
    fn test_standard_plan_has_23_trials() {
        let plan = RunPlan::standard();
        assert_eq!(plan.trial_count(), 23);

        let schedule = plan.schedule();
        assert_eq!(schedule.len(), 23);
        assert_eq!(schedule.first().unwrap().strategy, Strategy::Sequential);
        assert_eq!(schedule.last().unwrap().strategy, Strategy::Sequential);
        assert_eq!(
            schedule
                .iter()
                .filter(|t| t.strategy == Strategy::Sequential)
                .count(),
            2
        );
    }

    #[test]
    fn test_each_group_runs_every_concurrent_strategy_once() {
        for group in RunPlan::standard().groups() {
            for strategy in Strategy::CONCURRENT {
                assert_eq!(group.order.iter().filter(|s| **s == strategy).count(), 1);
            }
        }
    }

    #[test]
    fn test_schedule_ordinals_are_sequential() {
        let schedule = RunPlan::standard().schedule();
        for (index, trial) in schedule.iter().enumerate() {
            assert_eq!(trial.ordinal, index);
        }
        assert_eq!(schedule[1].group, Some(1));
        assert_eq!(schedule[21].group, Some(7));
    }

    #[test]
    fn test_group_description() {
        let plan = RunPlan::standard();
        assert_eq!(
            plan.groups()[2].describe(),
            "async -> multiprocessing -> threading"
        );
    }
}
