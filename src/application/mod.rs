// Application layer - Widget lifecycles and the observation source seam
pub mod conditions;
pub mod departures;
pub mod lights;
pub mod night_activity;
pub mod source;
pub mod weather_trends;
pub mod widget;
