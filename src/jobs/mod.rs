pub mod daily_reset;
