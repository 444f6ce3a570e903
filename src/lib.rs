pub mod engine;
pub mod tables;

pub use engine::{Estimate, Estimator, SeriesPoint};
pub use tables::{
    load_monthly_ridership, load_station_shares, DataLoadError, MonthlyRidership, StationShares,
};
