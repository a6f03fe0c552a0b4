/// The only price identifier KPI-variant payout libraries accept.
pub const KPI_PRICE_IDENTIFIER: &str = "General_KPI";

const KPI_MARKER: &str = "KPI Option";

pub const PRICE_IDENTIFIERS: [&str; 10] = [
    "General_KPI",
    "YES_OR_NO_QUERY",
    "ETHUSD",
    "BTCUSD",
    "UMAUSD",
    "USDETH",
    "USDBTC",
    "AAVEUSD",
    "SUSHIUSD",
    "UNIUSD",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayoutLibrary {
    BinaryOption,
    CappedYieldDollar,
    CoveredCall,
    Linear,
    RangeBond,
    SimpleSuccessToken,
    SuccessToken,
    KpiOptionLinear,
    KpiOptionBinary,
}

pub const ALL_PAYOUT_LIBRARIES: [PayoutLibrary; 9] = [
    PayoutLibrary::BinaryOption,
    PayoutLibrary::CappedYieldDollar,
    PayoutLibrary::CoveredCall,
    PayoutLibrary::Linear,
    PayoutLibrary::RangeBond,
    PayoutLibrary::SimpleSuccessToken,
    PayoutLibrary::SuccessToken,
    PayoutLibrary::KpiOptionLinear,
    PayoutLibrary::KpiOptionBinary,
];

pub const PAYOUT_LIBRARY_NAMES: [&str; 9] = [
    "BinaryOption",
    "CappedYieldDollar",
    "CoveredCall",
    "Linear",
    "RangeBond",
    "SimpleSuccessToken",
    "SuccessToken",
    "KPI Option - Linear",
    "KPI Option - Binary",
];

impl PayoutLibrary {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BinaryOption => "BinaryOption",
            Self::CappedYieldDollar => "CappedYieldDollar",
            Self::CoveredCall => "CoveredCall",
            Self::Linear => "Linear",
            Self::RangeBond => "RangeBond",
            Self::SimpleSuccessToken => "SimpleSuccessToken",
            Self::SuccessToken => "SuccessToken",
            Self::KpiOptionLinear => "KPI Option - Linear",
            Self::KpiOptionBinary => "KPI Option - Binary",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        ALL_PAYOUT_LIBRARIES
            .iter()
            .copied()
            .find(|library| library.as_str() == trimmed)
            .ok_or_else(|| format!("unknown payout library `{trimmed}`"))
    }

    pub fn is_kpi_variant(self) -> bool {
        is_kpi_library_name(self.as_str())
    }

    /// Libraries whose payout curve has an upper bound parameter.
    pub fn uses_upper_bound(self) -> bool {
        matches!(self, Self::RangeBond | Self::Linear | Self::KpiOptionLinear)
    }

    pub fn uses_base_percentage(self) -> bool {
        self == Self::SuccessToken
    }

    /// KPI names are shown verbatim, the rest in sentence case.
    pub fn display_name(self) -> String {
        if self.is_kpi_variant() {
            self.as_str().to_string()
        } else {
            super::camel_to_sentence_case(self.as_str())
        }
    }
}

impl std::fmt::Display for PayoutLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name-based check so unknown library names from a link still classify.
pub fn is_kpi_library_name(name: &str) -> bool {
    name.contains(KPI_MARKER)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollateralToken {
    pub currency: &'static str,
    pub addresses: &'static [&'static str],
}

pub const COLLATERAL_TOKENS: [CollateralToken; 6] = [
    CollateralToken {
        currency: "WETH",
        addresses: &[
            "https://etherscan.io/token/0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
            "https://polygonscan.com/token/0x7ceB23fD6bC0adD59E62ac25578270cFf1b9f619",
        ],
    },
    CollateralToken {
        currency: "USDC",
        addresses: &[
            "https://etherscan.io/token/0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
            "https://polygonscan.com/token/0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174",
        ],
    },
    CollateralToken {
        currency: "UMA",
        addresses: &[
            "https://etherscan.io/token/0x04Fa0d235C4abf4BcF4787aF4CF447DE572eF828",
            "https://polygonscan.com/token/0x3066818837c5e6eD6601bd5a91B0762877A6B731",
        ],
    },
    CollateralToken {
        currency: "DAI",
        addresses: &[
            "https://etherscan.io/token/0x6B175474E89094C44Da98b954EedeAC495271d0F",
            "https://polygonscan.com/token/0x8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063",
        ],
    },
    CollateralToken {
        currency: "WBTC",
        addresses: &["https://etherscan.io/token/0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599"],
    },
    CollateralToken {
        currency: "WMATIC",
        addresses: &["https://polygonscan.com/token/0x0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270"],
    },
];

pub const MAINNET_CHAIN_ID: u64 = 1;
pub const POLYGON_CHAIN_ID: u64 = 137;

fn explorer_marker(chain_id: u64) -> Option<&'static str> {
    match chain_id {
        MAINNET_CHAIN_ID => Some("etherscan"),
        POLYGON_CHAIN_ID => Some("polygonscan"),
        _ => None,
    }
}

/// Collateral currencies with a known address on `chain_id`. `None` means the
/// network has no registry and the field is entered as free text.
pub fn collateral_options(chain_id: Option<u64>) -> Option<Vec<&'static str>> {
    let marker = explorer_marker(chain_id?)?;
    Some(
        COLLATERAL_TOKENS
            .iter()
            .filter(|token| token.addresses.iter().any(|addr| addr.contains(marker)))
            .map(|token| token.currency)
            .collect(),
    )
}
