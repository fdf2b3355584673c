//! Scenario tests for the recursive regression model.

use chrono::{Datelike, TimeZone, Utc};
use demand_forecast::core::Frequency;
use demand_forecast::data::DemandTable;
use demand_forecast::error::ForecastError;
use demand_forecast::models::{
    DecompositionModel, ForecastModel, RegressionConfig, RegressionModel, RegressorKind,
    StatisticalModel,
};
use std::f64::consts::PI;

/// 36 month-start observations with a linear trend and yearly cycle.
fn trending_seasonal(n: usize) -> (DemandTable, Vec<f64>) {
    let anchor = Utc.with_ymd_and_hms(2020, 12, 1, 0, 0, 0).unwrap();
    let dates = Frequency::Monthly.future_dates(anchor, n).unwrap();
    let values: Vec<f64> = (0..n)
        .map(|t| {
            let t = t as f64;
            800.0 + 6.0 * t + 60.0 * (2.0 * PI * t / 12.0).sin() + 4.0 * (t * 2.3).cos()
        })
        .collect();
    let table = DemandTable::new()
        .with_dates("date", dates)
        .unwrap()
        .with_numeric("demand", values.clone())
        .unwrap();
    (table, values)
}

#[test]
fn twelve_month_forecast_on_three_years() {
    let (data, values) = trending_seasonal(36);
    let mut model = RegressionModel::new("regression");
    model.fit(&data, "demand", "date").unwrap();

    let forecast = model.predict(12).unwrap();
    assert_eq!(forecast.horizon(), 12);

    let first = forecast.dates()[0];
    assert_eq!((first.year(), first.month(), first.day()), (2024, 1, 1));

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    // Historical range widened by one more year of trend in either direction.
    let slack = 12.0 * 6.0 + (max - min);
    for record in forecast.records() {
        assert!(record.prediction > min - slack, "{:?}", record);
        assert!(record.prediction < max + slack, "{:?}", record);
        let lower = record.lower_bound.unwrap();
        let upper = record.upper_bound.unwrap();
        assert!(lower < record.prediction && record.prediction < upper);
    }

    let intervals = model.get_confidence_intervals(&forecast).unwrap();
    assert_eq!(intervals.len(), 12);
    assert_eq!(intervals[0].date, first);
}

#[test]
fn prefix_of_longer_forecast_matches_shorter_forecast() {
    let (data, _) = trending_seasonal(36);
    let mut model = RegressionModel::new("regression");
    model.fit(&data, "demand", "date").unwrap();

    let long = model.predict(12).unwrap();
    let short = model.predict(5).unwrap();
    assert_eq!(long.truncated(5), short);
}

#[test]
fn prediction_does_not_mutate_the_model() {
    let (data, _) = trending_seasonal(30);
    let mut model = RegressionModel::new("regression");
    model.fit(&data, "demand", "date").unwrap();

    let a = model.predict(4).unwrap();
    let _ = model.predict(10).unwrap();
    let b = model.predict(4).unwrap();
    assert_eq!(a, b);
}

#[test]
fn interval_level_widens_band() {
    let (data, _) = trending_seasonal(36);
    let mut narrow = RegressionModel::with_config(
        "narrow",
        RegressionConfig::default().with_interval_level(0.5).unwrap(),
    );
    let mut wide = RegressionModel::with_config(
        "wide",
        RegressionConfig::default().with_interval_level(0.99).unwrap(),
    );
    narrow.fit(&data, "demand", "date").unwrap();
    wide.fit(&data, "demand", "date").unwrap();

    assert!(wide.interval_half_width().unwrap() > narrow.interval_half_width().unwrap());
}

#[test]
fn every_model_rejects_predict_before_fit() {
    let models: Vec<Box<dyn ForecastModel>> = vec![
        Box::new(RegressionModel::new("regression")),
        Box::new(StatisticalModel::new("ets")),
        Box::new(DecompositionModel::new("mstl")),
    ];
    for model in &models {
        match model.predict(3) {
            Err(ForecastError::State(msg)) => assert!(msg.contains("not fitted")),
            other => panic!("{}: unexpected {:?}", model.name(), other.map(|s| s.horizon())),
        }
    }
}

#[test]
fn every_model_rejects_missing_columns() {
    let (data, _) = trending_seasonal(36);
    let mut models: Vec<Box<dyn ForecastModel>> = vec![
        Box::new(RegressionModel::new("regression")),
        Box::new(StatisticalModel::new("ets")),
        Box::new(DecompositionModel::new("mstl")),
    ];
    for model in &mut models {
        assert!(matches!(
            model.fit(&data, "sales", "date"),
            Err(ForecastError::Configuration(_))
        ));
        assert!(matches!(
            model.fit(&data, "demand", "timestamp"),
            Err(ForecastError::Configuration(_))
        ));
        assert!(!model.is_fitted());
    }
}

#[test]
fn seeded_forest_is_reproducible() {
    let (data, values) = trending_seasonal(36);
    let forest = || {
        RegressionModel::with_config(
            "forest",
            RegressionConfig::default().with_regressor("random_forest".parse().unwrap()),
        )
    };
    let mut a = forest();
    let mut b = forest();
    a.fit(&data, "demand", "date").unwrap();
    b.fit(&data, "demand", "date").unwrap();

    let long = a.predict(12).unwrap();
    assert_eq!(long, b.predict(12).unwrap());
    assert_eq!(long.truncated(7), a.predict(7).unwrap());

    // Tree leaves average training targets, so the recursion stays in range.
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    assert!(long.point().iter().all(|p| (min..=max).contains(p)));
}

#[test]
fn forest_seed_is_configurable() {
    let (data, _) = trending_seasonal(36);
    let config = RegressionConfig::default().with_regressor(RegressorKind::RandomForest {
        n_trees: 20,
        seed: 7,
    });
    let mut model = RegressionModel::with_config("forest", config);
    model.fit(&data, "demand", "date").unwrap();
    assert_eq!(model.predict(6).unwrap().horizon(), 6);
}
