//! Combined assessment and plan payload

use serde::{Deserialize, Serialize};

use kubeadvisor_analysis::ImpactAssessment;

use crate::planner::UpgradePlan;

/// An assessment with the plan's step summary lines attached
///
/// The assessment fields are flattened into the top-level object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentWithPlan {
    #[serde(flatten)]
    pub assessment: ImpactAssessment,
    pub ordered_upgrade_steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrade_plan: Option<UpgradePlan>,
}

impl AssessmentWithPlan {
    pub fn new(assessment: ImpactAssessment, plan: UpgradePlan) -> Self {
        Self {
            assessment,
            ordered_upgrade_steps: plan.ordered_upgrade_steps.clone(),
            upgrade_plan: Some(plan),
        }
    }

    /// Summary lines only, without the full plan
    pub fn summary_only(assessment: ImpactAssessment, plan: &UpgradePlan) -> Self {
        Self {
            assessment,
            ordered_upgrade_steps: plan.ordered_upgrade_steps.clone(),
            upgrade_plan: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Planner;

    #[test]
    fn test_flattened_json() {
        let assessment = ImpactAssessment::new("cluster-1", "1.24", "1.25").finalize();
        let plan = Planner::new().generate_plan(&assessment).unwrap();
        let response = AssessmentWithPlan::summary_only(assessment, &plan);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["clusterId"], "cluster-1");
        assert_eq!(json["overallRisk"], "none");
        assert_eq!(json["orderedUpgradeSteps"].as_array().unwrap().len(), 4);
        assert_eq!(
            json["orderedUpgradeSteps"][0],
            "1. [precheck] Pre-upgrade validation and checks"
        );
        assert!(json.get("upgradePlan").is_none());
    }

    #[test]
    fn test_full_plan_included() {
        let assessment = ImpactAssessment::new("cluster-1", "1.24", "1.25").finalize();
        let plan = Planner::new().generate_plan(&assessment).unwrap();
        let response = AssessmentWithPlan::new(assessment, plan);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["upgradePlan"]["totalSteps"], 4);
        assert_eq!(json["upgradePlan"]["steps"][3]["id"], "validation");
    }
}
