//! `ConditionalMergeImpl`: first matching condition's update is merged into
//! the event.

use vpl_kernel::error::{LabelerError, LabelerResult};
use vpl_kernel::event::LabelerEvent;
use vpl_kernel::filter::Filter;

struct Branch {
    condition: Filter,
    update: LabelerEvent,
}

pub struct ConditionalMergeImpl {
    branches: Vec<Branch>,
    pass_through_non_matches: bool,
}

impl ConditionalMergeImpl {
    /// Build from an ordered, non-empty list of `(condition, update)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::InvalidArgument`] if `conditions_and_updates`
    /// is empty.
    pub fn build(
        conditions_and_updates: Vec<(Filter, LabelerEvent)>,
        pass_through_non_matches: bool,
    ) -> LabelerResult<Self> {
        if conditions_and_updates.is_empty() {
            return Err(LabelerError::InvalidArgument(
                "conditional merge requires at least one condition/update pair".to_string(),
            ));
        }
        let branches = conditions_and_updates
            .into_iter()
            .map(|(condition, update)| Branch { condition, update })
            .collect();
        Ok(Self {
            branches,
            pass_through_non_matches,
        })
    }

    /// Apply: merge the first matching branch's update into `event`.
    ///
    /// # Errors
    ///
    /// Returns [`LabelerError::InvalidArgument`] if no branch matches and
    /// `pass_through_non_matches` is false.
    pub fn update(&self, event: &mut LabelerEvent) -> LabelerResult<()> {
        match self.branches.iter().find(|b| b.condition.matches(event)) {
            Some(branch) => {
                event.merge_from(&branch.update);
                Ok(())
            }
            None if self.pass_through_non_matches => Ok(()),
            None => Err(LabelerError::InvalidArgument(
                "conditional merge: no condition matched the event".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vpl_kernel::event::Gender;
    use vpl_kernel::filter::FilterConfig;

    fn filter_equals(field: &str, value: serde_json::Value) -> Filter {
        Filter::build(&FilterConfig::Equals {
            field: field.to_string(),
            value,
        })
        .unwrap()
    }

    #[test]
    fn rejects_empty() {
        assert!(ConditionalMergeImpl::build(vec![], false).is_err());
    }

    #[test]
    fn first_match_wins() {
        let mut update_a = LabelerEvent::default();
        update_a.acting_demo.gender = Some(Gender::Male);
        let mut update_b = LabelerEvent::default();
        update_b.acting_demo.gender = Some(Gender::Female);

        let merge = ConditionalMergeImpl::build(
            vec![
                (
                    filter_equals("person_country_code", serde_json::json!("US")),
                    update_a,
                ),
                (
                    filter_equals("person_country_code", serde_json::json!("US")),
                    update_b,
                ),
            ],
            false,
        )
        .unwrap();

        let mut event = LabelerEvent::default();
        event.person_country_code = Some("US".to_string());
        merge.update(&mut event).unwrap();
        assert_eq!(event.acting_demo.gender, Some(Gender::Male));
    }

    #[test]
    fn no_match_without_pass_through_fails() {
        let merge = ConditionalMergeImpl::build(
            vec![(
                filter_equals("person_country_code", serde_json::json!("US")),
                LabelerEvent::default(),
            )],
            false,
        )
        .unwrap();
        let mut event = LabelerEvent::default();
        event.person_country_code = Some("CA".to_string());
        assert!(merge.update(&mut event).is_err());
    }

    #[test]
    fn no_match_with_pass_through_succeeds_unchanged() {
        let merge = ConditionalMergeImpl::build(
            vec![(
                filter_equals("person_country_code", serde_json::json!("US")),
                LabelerEvent::default(),
            )],
            true,
        )
        .unwrap();
        let mut event = LabelerEvent::default();
        event.person_country_code = Some("CA".to_string());
        merge.update(&mut event).unwrap();
        assert_eq!(event.person_country_code.as_deref(), Some("CA"));
    }
}
