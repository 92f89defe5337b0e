use serde::{Deserialize, Serialize};

pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Deserializes a value that the API sends either as a number or as a
/// string containing a number.
pub mod string_or_float {
    use serde::{self, Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(*value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringOrFloat;

        impl<'de> serde::de::Visitor<'de> for StringOrFloat {
            type Value = f64;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a float or a string containing a float")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.parse::<f64>().map_err(serde::de::Error::custom)
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(value)
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(value as f64)
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(value as f64)
            }
        }

        deserializer.deserialize_any(StringOrFloat)
    }
}

/// Quote response from the v6 quote endpoint. Re-serialized verbatim into
/// the swap request, so the field set must cover what the API echoes back.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub input_mint: String,
    pub output_mint: String,
    pub in_amount: String,
    pub out_amount: String,
    pub other_amount_threshold: String,
    pub swap_mode: String,
    pub slippage_bps: u64,
    #[serde(with = "string_or_float", default)]
    pub price_impact_pct: f64,
    pub route_plan: Vec<RoutePlan>,
    pub context_slot: Option<u64>,
    pub time_taken: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlan {
    pub swap_info: SwapInfo,
    pub percent: u8,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapInfo {
    pub amm_key: String,
    pub label: Option<String>,
    pub input_mint: String,
    pub output_mint: String,
    pub in_amount: String,
    pub out_amount: String,
    pub fee_amount: String,
    pub fee_mint: String,
}

/// Request body for the v6 swap endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub user_public_key: String,
    #[serde(rename = "wrapAndUnwrapSol")]
    pub wrap_and_unwrap_sol: bool,
    pub prioritization_fee_lamports: PrioritizationFeeLamports,
    pub quote_response: QuoteResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PrioritizationFeeLamports {
    Auto { auto: bool },
    Exact { lamports: u64 },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    /// base64-encoded serialized `VersionedTransaction`
    pub swap_transaction: String,
    pub last_valid_block_height: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_impact_decodes_from_string_or_number() {
        let as_string = r#"{
            "inputMint": "a", "outputMint": "b",
            "inAmount": "100", "outAmount": "99",
            "otherAmountThreshold": "98", "swapMode": "ExactIn",
            "slippageBps": 50, "priceImpactPct": "0.0012", "routePlan": []
        }"#;
        let quote: QuoteResponse = serde_json::from_str(as_string).unwrap();
        assert_eq!(quote.price_impact_pct, 0.0012);

        let as_number = as_string.replace("\"0.0012\"", "0.0012");
        let quote: QuoteResponse = serde_json::from_str(&as_number).unwrap();
        assert_eq!(quote.price_impact_pct, 0.0012);
    }

    #[test]
    fn swap_request_serializes_exact_priority_fee() {
        let request = SwapRequest {
            user_public_key: "user".into(),
            wrap_and_unwrap_sol: true,
            prioritization_fee_lamports: PrioritizationFeeLamports::Exact { lamports: 5000 },
            quote_response: QuoteResponse::default(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["prioritizationFeeLamports"]["lamports"], 5000);
        assert_eq!(json["wrapAndUnwrapSol"], true);
    }
}
