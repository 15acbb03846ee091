//! Unit tests for fleet-core primitives.

#[cfg(test)]
mod ids {
    use crate::{BikeId, StationId};

    #[test]
    fn index_roundtrip() {
        let id = BikeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(BikeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(StationId(0) < StationId(1));
    }

    #[test]
    fn display() {
        assert_eq!(BikeId(7).to_string(), "BikeId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{DistanceProvider, GeoPoint, HaversineDistance};

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(42.3601, -71.0589);
        assert!(p.haversine_m(p) < 0.01);
    }

    #[test]
    fn one_degree_latitude() {
        let a = GeoPoint::new(42.0, -71.0);
        let b = GeoPoint::new(43.0, -71.0);
        let d = a.haversine_m(b);
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
    }

    #[test]
    fn detour_factor_scales_and_is_floored_at_one() {
        let a = GeoPoint::new(42.0, -71.0);
        let b = GeoPoint::new(42.01, -71.0);
        let base = HaversineDistance::default().distance_m(a, b);
        let scaled = HaversineDistance::new(1.3).distance_m(a, b);
        assert!((scaled - base * 1.3).abs() < 1e-6);
        assert_eq!(HaversineDistance::new(0.5).detour_factor, 1.0);
    }

    #[test]
    fn provider_by_reference() {
        fn total<D: DistanceProvider>(d: D, a: GeoPoint, b: GeoPoint) -> f64 {
            d.distance_m(a, b)
        }
        let h = HaversineDistance::default();
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 0.01);
        assert_eq!(total(&h, a, b), h.distance_m(a, b));
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimDuration, SimTime};

    #[test]
    fn duration_rounds_to_nearest_milli() {
        assert_eq!(SimDuration::from_secs_f64(1.0004), SimDuration(1_000));
        assert_eq!(SimDuration::from_secs_f64(1.0006), SimDuration(1_001));
        assert_eq!(SimDuration::from_secs_f64(17_999.999_999_9), SimDuration::from_secs(18_000));
    }

    #[test]
    fn negative_and_nan_collapse_to_zero() {
        assert!(SimDuration::from_secs_f64(-3.0).is_zero());
        assert!(SimDuration::from_secs_f64(f64::NAN).is_zero());
    }

    #[test]
    fn travel_time() {
        // 700 m at 1.4 m/s = 500 s
        assert_eq!(SimDuration::travel(700.0, 1.4), SimDuration::from_secs(500));
    }

    #[test]
    fn time_arithmetic() {
        let t = SimTime(10_000);
        assert_eq!(t + SimDuration::from_secs(5), SimTime(15_000));
        assert_eq!(SimTime(15_000) - t, SimDuration(5_000));
        assert_eq!(t.since(SimTime(20_000)), SimDuration::ZERO);
        assert_eq!(SimTime::MAX + SimDuration(1), SimTime::MAX);
    }

    #[test]
    fn whole_seconds_saturate() {
        assert_eq!(SimDuration::from_secs(u64::MAX), SimDuration(u64::MAX));
        assert_eq!(SimDuration::from_secs(u64::MAX / 1_000 + 1), SimDuration(u64::MAX));
    }

    #[test]
    fn display() {
        assert_eq!(SimTime(1_234_500).to_string(), "1234.500");
        assert_eq!(SimDuration(1_500).to_string(), "1.500s");
    }

    #[test]
    fn clock_advances_forward_only() {
        let mut clock = SimClock::new();
        clock.advance_to(SimTime(3_661_000));
        assert_eq!(clock.now(), SimTime(3_661_000));
        assert_eq!(clock.to_string(), "3661.000 (01:01:01)");
    }
}

#[cfg(test)]
mod config {
    use crate::{FleetConfig, OperatingMode, SimDuration, SimTime};

    #[test]
    fn defaults_are_valid() {
        FleetConfig::default().validate().unwrap();
    }

    #[test]
    fn default_speeds_match_kmh() {
        let cfg = FleetConfig::default();
        assert!((cfg.walking_speed_mps * 3.6 - 5.0).abs() < 1e-9);
        assert!((cfg.riding_speed_mps * 3.6 - 15.0).abs() < 1e-9);
        assert!((cfg.aut_driving_speed_mps * 3.6 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn full_charge_from_empty_takes_five_hours() {
        let cfg = FleetConfig::default();
        assert_eq!(cfg.charging_time(0.0), SimDuration::from_secs(18_000));
        assert_eq!(cfg.charging_time(100.0), SimDuration::ZERO);
        assert_eq!(cfg.charging_time(50.0), SimDuration::from_secs(9_000));
    }

    #[test]
    fn rejects_non_positive_speed() {
        let cfg = FleetConfig { riding_speed_mps: 0.0, ..FleetConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_battery_threshold_out_of_range() {
        let cfg = FleetConfig { min_battery_level: 120.0, ..FleetConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_charge_attempts() {
        let cfg = FleetConfig { max_charge_search_attempts: 0, ..FleetConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_invalid_horizon() {
        for h in [f64::NAN, -1.0, f64::INFINITY] {
            let cfg = FleetConfig { horizon_secs: Some(h), ..FleetConfig::default() };
            assert!(cfg.validate().is_err(), "horizon {h} accepted");
        }
        let zero = FleetConfig { horizon_secs: Some(0.0), ..FleetConfig::default() };
        zero.validate().unwrap();
    }

    #[test]
    fn horizon_defaults_to_unbounded() {
        assert_eq!(FleetConfig::default().horizon(), SimTime::MAX);
        let cfg = FleetConfig { horizon_secs: Some(60.0), ..FleetConfig::default() };
        assert_eq!(cfg.horizon(), SimTime(60_000));
    }

    #[test]
    fn mode_parses_names_and_legacy_numbers() {
        assert_eq!("dockless".parse::<OperatingMode>().unwrap(), OperatingMode::Dockless);
        assert_eq!("0".parse::<OperatingMode>().unwrap(), OperatingMode::StationBased);
        assert!("tandem".parse::<OperatingMode>().is_err());
        assert_eq!(OperatingMode::Autonomous.to_string(), "autonomous");
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        let xs: Vec<usize> = (0..16).map(|_| a.gen_range(0..1000)).collect();
        let ys: Vec<usize> = (0..16).map(|_| b.gen_range(0..1000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn choose_index_empty() {
        let mut rng = SimRng::new(1);
        assert_eq!(rng.choose_index(0), None);
        assert!(rng.choose_index(3).unwrap() < 3);
    }
}
