use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, TimeZone, Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempcal::ntp::{NtpMeasurement, NtpQuery};
use tempcal::{
    end_of_year, first_workday_day, parse_iso8601, start_of_year, to_date_time, to_iso8601_utc,
    to_timestamp, try_parse_ts, weekday_of_ts, Aggregation, DateTime, ElapsedTimer, JulianDate,
    MoonPhase, NtpError, NtpPool, NtpPoolConfig, NtpPoolRunner, NtpServerConfig, NtpTimeService,
    Time, TimeError, UnixTime, Weekday,
};

struct FixedServers(HashMap<String, (i64, i64)>);

impl NtpQuery for FixedServers {
    fn query(&self, host: &str, _port: u16) -> Result<NtpMeasurement, NtpError> {
        self.0
            .get(host)
            .map(|&(offset_us, delay_us)| NtpMeasurement {
                offset_us,
                delay_us,
                stratum: 2,
            })
            .ok_or(NtpError::Transport {
                code: -1,
                message: format!("{host}: unreachable"),
            })
    }
}

#[test]
fn epoch_maps_to_midnight_1970() {
    assert_eq!(to_timestamp(1970, 1, 1, 0, 0, 0), Ok(0));
    assert_eq!(to_date_time(0), DateTime::new(1970, 1, 1, 0, 0, 0, 0));
}

#[test]
fn leap_day_2024_round_trips_through_text() {
    let ts = to_timestamp(2024, 2, 29, 12, 34, 56).unwrap();
    assert_eq!(ts, 1_709_210_096);
    assert_eq!(weekday_of_ts(ts), Weekday::Thu);

    let text = to_iso8601_utc(ts);
    assert_eq!(text, "2024-02-29T12:34:56Z");
    assert_eq!(try_parse_ts(&text), Ok(ts));
    let (dt, tz) = parse_iso8601(&text).unwrap();
    assert_eq!(dt.to_ts(), Ok(ts));
    assert_eq!(tz.to_seconds(), 0);
}

#[test]
fn year_bounds_of_2024() {
    let ts = 1_709_210_096;
    assert_eq!(start_of_year(ts), 1_704_067_200);
    assert_eq!(end_of_year(ts), 1_735_689_599);
}

#[test]
fn kernel_agrees_with_chrono() {
    let mut rng = StdRng::seed_from_u64(0x7E3C_A100);
    for _ in 0..20_000 {
        let ts = rng.gen_range(-62_135_596_800_i64..253_402_300_799);
        let ours = to_date_time(ts);
        let theirs = Utc.timestamp_opt(ts, 0).unwrap();
        assert_eq!(ours.year, i64::from(theirs.year()), "ts {ts}");
        assert_eq!(ours.month as u32, theirs.month());
        assert_eq!(ours.day as u32, theirs.day());
        assert_eq!(ours.hour as u32, theirs.hour());
        assert_eq!(ours.min as u32, theirs.minute());
        assert_eq!(ours.sec as u32, theirs.second());
        assert_eq!(weekday_of_ts(ts).iso_number(), i64::from(theirs.weekday().number_from_monday()));
    }
}

#[test]
fn iso_text_round_trips_over_four_digit_years() {
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..5_000 {
        let ts = rng.gen_range(0_i64..253_402_300_799);
        assert_eq!(try_parse_ts(&to_iso8601_utc(ts)), Ok(ts));
    }
}

#[test]
fn june_2024_workdays() {
    assert_eq!(first_workday_day(2024, 6), 3);
    assert_eq!(tempcal::last_workday_day(2024, 6), 28);
    assert_eq!(tempcal::count_workdays_in_month(2024, 6), 20);
}

#[test]
fn typed_instant_matches_calendar() {
    let ts = 1_709_210_096;
    let unix = Time::<UnixTime>::from_unix_seconds(ts as f64);
    let jd: JulianDate = unix.to();
    assert!((jd.value() - tempcal::ts_to_jd(ts)).abs() < 1e-9);
    let utc = jd.to_utc().unwrap();
    assert!((utc.timestamp_millis() - ts * 1_000).abs() <= 1);
}

#[test]
fn moon_phase_follows_quarters() {
    let ts = 1_709_210_096.0;
    let moon = MoonPhase;
    let quarters = moon.quarter_instants(ts);
    let (prev_new, next_new) = quarters.pair(tempcal::Quarter::New);
    assert!(prev_new <= ts && ts < next_new);
    let phase = moon.compute_phase(prev_new + 1.0);
    assert!(!(0.02..=0.98).contains(&phase), "phase {phase}");
    let period_days = (next_new - prev_new) / 86_400.0;
    assert!((29.0..30.0).contains(&period_days));
}

#[test]
fn pool_median_over_three_servers() {
    let servers = FixedServers(HashMap::from([
        ("a".to_string(), (100, 10)),
        ("b".to_string(), (200, 20)),
        ("c".to_string(), (300, 30)),
    ]));
    let cfg = NtpPoolConfig {
        aggregation: Aggregation::Median,
        smoothing_alpha: 1.0,
        rng_seed: 42,
        ..NtpPoolConfig::default()
    };
    let pool = NtpPool::with_query(cfg, servers);
    pool.set_servers(["a", "b", "c"].into_iter().map(NtpServerConfig::new).collect());

    assert!(pool.measure());
    assert_eq!(pool.offset_us(), 200);
    assert_eq!((pool.delay_us(), pool.stratum(), pool.last_error_code()), (20, 2, 0));
    let samples = pool.last_samples();
    assert_eq!(samples.len(), 3);
    assert!(samples.iter().all(|s| s.is_ok && s.error_code == 0));
}

#[test]
fn pool_without_enough_answers_keeps_offset() {
    let servers = FixedServers(HashMap::from([("a".to_string(), (500, 10))]));
    let pool = NtpPool::with_query(
        NtpPoolConfig {
            rng_seed: 1,
            ..NtpPoolConfig::default()
        },
        servers,
    );
    pool.set_servers(["a", "down1", "down2"].into_iter().map(NtpServerConfig::new).collect());
    assert!(!pool.measure());
    assert_eq!(pool.offset_us(), 0);
    assert_eq!(pool.last_error_code(), -1);
    assert_eq!(
        pool.last_samples().iter().filter(|s| !s.is_ok).count(),
        2
    );
}

#[test]
fn runner_and_service_over_fixed_servers() {
    let cfg = NtpPoolConfig {
        min_valid_samples: 1,
        rng_seed: 11,
        ..NtpPoolConfig::default()
    };
    let pool = Arc::new(NtpPool::with_query(
        cfg.clone(),
        FixedServers(HashMap::from([("a".to_string(), (-900, 12))])),
    ));
    pool.set_servers(vec![NtpServerConfig::new("a")]);
    let runner = NtpPoolRunner::from_shared(Arc::clone(&pool));
    assert!(runner.measure_now());
    assert_eq!(pool.offset_us(), -900);
    assert_eq!(runner.measure_count(), 1);
    drop(runner);

    let service = NtpTimeService::with_query(|| {
        FixedServers(HashMap::from([("a".to_string(), (300, 5))]))
    });
    assert!(service.set_servers(vec![NtpServerConfig::new("a")]));
    assert!(service.set_pool_config(cfg));
    assert!(service.init_with(Duration::from_secs(3_600)));
    assert_eq!(service.offset_us(), 300);
    assert!(!service.stale(Duration::from_secs(60)));
    service.shutdown();
    assert!(!service.running());
}

#[test]
fn impossible_dates_do_not_roll_over() {
    assert_eq!(to_timestamp(5, 2, 32, 0, 0, 0), Err(TimeError::InvalidDateTime));
    assert_eq!(try_parse_ts("0005-02-32T00:00:00Z"), Err(TimeError::InvalidDateTime));
    assert_eq!(to_timestamp(29, 2, 2024, 0, 0, 0), to_timestamp(2024, 2, 29, 0, 0, 0));
}

#[test]
fn elapsed_timer_is_monotonic() {
    let timer = ElapsedTimer::started();
    let mut prev = timer.elapsed_ns();
    for _ in 0..1_000 {
        let now = timer.elapsed_ns();
        assert!(now >= prev);
        prev = now;
    }
}

#[cfg(feature = "serde")]
#[test]
fn serde_value_types() {
    let dt = DateTime::new(2024, 2, 29, 12, 34, 56, 789);
    let json = serde_json::to_string(&dt).unwrap();
    assert!(json.contains("\"year\":2024"));
    let back: DateTime = serde_json::from_str(&json).unwrap();
    assert_eq!(back, dt);

    let jd = JulianDate::new(2_451_545.0);
    assert_eq!(serde_json::to_string(&jd).unwrap(), "2451545.0");

    let cfg = NtpPoolConfig::default();
    let back: NtpPoolConfig =
        serde_json::from_str(&serde_json::to_string(&cfg).unwrap()).unwrap();
    assert_eq!(back, cfg);
}
