/// 四舍五入（round-half-up）到指定小数位
///
/// 先放大再 `floor(x + 0.5)`，附加极小偏移以抵消二进制浮点误差
/// （例如 `2.675 * 100 = 267.49999...`）。
pub fn round_half_up(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    ((value * factor) + 0.5 + 1e-9).floor() / factor
}
