// binance http工具

use crate::binance::errors::{BinanceError, Result};

pub fn sort_params(params: &mut Vec<(&str, String)>) {
    params.sort_by(|a, b| a.0.cmp(b.0));
}

pub fn encode_params(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<String>>()
        .join("&")
}

pub fn hmac_sha256(key: &str, data: &str) -> Result<String> {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let mut mac =
        Hmac::<Sha256>::new_from_slice(key.as_bytes()).map_err(|e| {
            BinanceError::ParametersInvalid {
                message: format!("invalid secret key: {}", e),
            }
        })?;
    mac.update(data.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// 追加签名接口必须的 timestamp 与 recvWindow
pub fn push_timestamp(params: &mut Vec<(&str, String)>, timestamp: u128, recv_window: u64) {
    params.retain(|(k, _)| *k != "timestamp" && *k != "recvWindow");
    params.push(("timestamp", timestamp.to_string()));
    params.push(("recvWindow", recv_window.to_string()));
}
