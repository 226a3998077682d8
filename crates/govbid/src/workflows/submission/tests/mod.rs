mod common;
mod readiness;
