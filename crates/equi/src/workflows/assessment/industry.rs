use serde::{Deserialize, Serialize};

use super::domain::Transaction;

/// Closed set of pseudo-industries inferred from an upload's file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Industry {
    FoodAndBeverage,
    Freelance,
    Retail,
    Technology,
    GeneralBusiness,
}

impl Industry {
    pub fn label(&self) -> &'static str {
        match self {
            Industry::FoodAndBeverage => "Food & Beverage Industry",
            Industry::Freelance => "Freelance / Professional Services",
            Industry::Retail => "Retail & E-commerce",
            Industry::Technology => "Technology & IT Services",
            Industry::GeneralBusiness => "General Business",
        }
    }

    pub fn profile(self) -> IndustryProfile {
        let (base_income, frequency, avg_amount, risk_factor) = match self {
            Industry::FoodAndBeverage => (28_000.0, 25, 1_200.0, 0.35),
            Industry::Freelance => (45_000.0, 12, 3_500.0, 0.25),
            Industry::Retail => (38_000.0, 20, 1_800.0, 0.28),
            Industry::Technology => (55_000.0, 10, 5_000.0, 0.20),
            Industry::GeneralBusiness => (35_000.0, 15, 2_000.0, 0.30),
        };

        IndustryProfile {
            industry: self,
            base_income,
            frequency,
            avg_amount,
            risk_factor,
        }
    }

    /// Income descriptions used when synthesizing statements for this industry.
    pub fn income_phrases(&self) -> &'static [&'static str] {
        match self {
            Industry::FoodAndBeverage => &[
                "Food Delivery Payment",
                "Restaurant Sale",
                "Catering Service",
                "Menu Order #",
            ],
            Industry::Freelance => &[
                "Project Payment",
                "Consulting Fee",
                "Design Work",
                "Development Invoice",
            ],
            Industry::Retail => &["Online Sale", "Product Sale", "Customer Payment", "Order #"],
            Industry::Technology => &[
                "Software License",
                "IT Consulting",
                "Tech Support",
                "Development Fee",
            ],
            Industry::GeneralBusiness => &[
                "Service Payment",
                "Sales Revenue",
                "Customer Payment",
                "Invoice #",
            ],
        }
    }
}

/// Generation anchors for one industry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndustryProfile {
    pub industry: Industry,
    /// Typical monthly income; informational only, generation is driven by
    /// `frequency` and `avg_amount`.
    pub base_income: f64,
    /// Income events per 30-day window.
    pub frequency: u32,
    pub avg_amount: f64,
    pub risk_factor: f64,
}

impl IndustryProfile {
    pub fn industry_type(&self) -> &'static str {
        self.industry.label()
    }
}

// Order matters: the first rule with a matching keyword wins.
const RULES: [(&[&str], Industry); 4] = [
    (&["food", "market", "restaurant"], Industry::FoodAndBeverage),
    (&["invoice", "job", "freelance", "project"], Industry::Freelance),
    (&["shop", "retail", "store"], Industry::Retail),
    (&["tech", "software", "it"], Industry::Technology),
];

/// Keyword classification of a file name. Unmatched names fall back to
/// [`Industry::GeneralBusiness`].
pub fn classify_industry(file_name: &str) -> IndustryProfile {
    let name = file_name.to_lowercase();

    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| name.contains(keyword)))
        .map(|(_, industry)| *industry)
        .unwrap_or(Industry::GeneralBusiness)
        .profile()
}

/// Sector read off a real statement's transaction descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementIndustry {
    Freelance,
    Retail,
    Other,
    /// No transactions to read.
    Unknown,
}

impl StatementIndustry {
    pub fn label(&self) -> &'static str {
        match self {
            StatementIndustry::Freelance => "Freelance",
            StatementIndustry::Retail => "Retail",
            StatementIndustry::Other => "Other",
            StatementIndustry::Unknown => "Unknown",
        }
    }
}

const FREELANCE_KEYWORDS: &[&str] = &["ค่าจ้าง", "freelance"];
const RETAIL_KEYWORDS: &[&str] = &["วัตถุดิบ", "ขายของ"];

/// Keyword classification of statement descriptions. Freelance wins when
/// both keyword sets appear.
pub fn classify_statement(transactions: &[Transaction]) -> StatementIndustry {
    if transactions.is_empty() {
        return StatementIndustry::Unknown;
    }

    let descriptions: Vec<String> = transactions
        .iter()
        .map(|txn| txn.description.to_lowercase())
        .collect();
    let mentions = |keywords: &[&str]| {
        descriptions
            .iter()
            .any(|text| keywords.iter().any(|keyword| text.contains(keyword)))
    };

    if mentions(FREELANCE_KEYWORDS) {
        StatementIndustry::Freelance
    } else if mentions(RETAIL_KEYWORDS) {
        StatementIndustry::Retail
    } else {
        StatementIndustry::Other
    }
}
