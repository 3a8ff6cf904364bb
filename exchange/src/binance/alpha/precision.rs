use rust_decimal::{Decimal, RoundingStrategy};

/// 交易对未给出精度时使用
pub const DEFAULT_PRECISION: u32 = 8;

// Decimal 最多保存 28 位小数，更高的精度只补零
const MAX_SCALE: u32 = 28;

/// 按小数位数输出定点字符串，四舍五入（远离零），不会出现科学计数法
///
/// 输出的小数位数总是等于 `precision`，超出 Decimal 表示范围的部分以 0 补齐。
pub fn format_with_precision(value: Decimal, precision: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(
        precision.min(MAX_SCALE),
        RoundingStrategy::MidpointAwayFromZero,
    );
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }

    let text = rounded.to_string();
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    if precision == 0 {
        return integer.to_string();
    }
    format!(
        "{}.{:0<width$}",
        integer,
        fraction,
        width = precision as usize
    )
}
