use std::fmt;

/// Closed set of analysis goal codes understood by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisGoal {
    #[default]
    PainPoints,
    FeatureRequests,
    PurchaseDrivers,
    PositiveFeedback,
    LeadGeneration,
    CacReduction,
    BrandAwareness,
    MarketExpansion,
}

impl AnalysisGoal {
    /// Every goal, in the order a selection UI presents them.
    pub const ALL: [AnalysisGoal; 8] = [
        AnalysisGoal::PainPoints,
        AnalysisGoal::FeatureRequests,
        AnalysisGoal::PurchaseDrivers,
        AnalysisGoal::PositiveFeedback,
        AnalysisGoal::LeadGeneration,
        AnalysisGoal::CacReduction,
        AnalysisGoal::BrandAwareness,
        AnalysisGoal::MarketExpansion,
    ];

    /// Wire code carried in the submission body.
    pub fn code(self) -> &'static str {
        match self {
            AnalysisGoal::PainPoints => "pain_points",
            AnalysisGoal::FeatureRequests => "feature_requests",
            AnalysisGoal::PurchaseDrivers => "purchase_drivers",
            AnalysisGoal::PositiveFeedback => "positive_feedback",
            AnalysisGoal::LeadGeneration => "lead_generation",
            AnalysisGoal::CacReduction => "cac_reduction",
            AnalysisGoal::BrandAwareness => "brand_awareness",
            AnalysisGoal::MarketExpansion => "market_expansion",
        }
    }

    /// Inverse of [`AnalysisGoal::code`]; `None` for unknown codes.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|goal| goal.code() == code)
    }

    /// Human-readable label for selection UIs.
    pub fn label(self) -> &'static str {
        match self {
            AnalysisGoal::PainPoints => "Find Customer Pain Points",
            AnalysisGoal::FeatureRequests => "Collect Feature Requests",
            AnalysisGoal::PurchaseDrivers => "Understand Purchase Drivers",
            AnalysisGoal::PositiveFeedback => "Gather Positive Feedback",
            AnalysisGoal::LeadGeneration => "Find Lead Generation Needs",
            AnalysisGoal::CacReduction => "Identify CAC Reduction Pain",
            AnalysisGoal::BrandAwareness => "Track Brand Awareness Goals",
            AnalysisGoal::MarketExpansion => "Discover Market Expansion Plans",
        }
    }
}

impl fmt::Display for AnalysisGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
