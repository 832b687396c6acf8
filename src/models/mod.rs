pub mod cwa_forecast;
