pub mod data;
pub mod pucker;
pub mod run;
