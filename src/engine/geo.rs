// ==========================================
// 经销商网络决策支持系统 - 地理距离
// ==========================================

/// 地球平均半径 (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// 两点间大圆距离 (km)，haversine 公式
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // 浮点误差可能让 a 略大于 1
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(haversine_km(19.07, 72.87, 19.07, 72.87), 0.0);
    }

    #[test]
    fn test_delhi_mumbai() {
        // 新德里 - 孟买 约 1150 km
        let d = haversine_km(28.6139, 77.2090, 19.0760, 72.8777);
        assert!((d - 1150.0).abs() < 15.0, "distance = {}", d);
    }

    #[test]
    fn test_symmetric_and_antipodal() {
        let ab = haversine_km(10.0, 20.0, -30.0, 140.0);
        let ba = haversine_km(-30.0, 140.0, 10.0, 20.0);
        assert!((ab - ba).abs() < 1e-9);

        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((haversine_km(0.0, 0.0, 0.0, 180.0) - half_circumference).abs() < 1e-6);
    }
}
