//! Core validation building blocks: scene id parsing, expected-CRS
//! construction, validator configuration and the validation state machine.
//! These are consumed by the high-level `api` module.
pub mod params;
pub mod reference;
pub mod scene;
pub mod validator;
