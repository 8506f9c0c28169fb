//! Benchmark example handlers (sink modules).
//!
//! The benchmark's value lies in a large corpus of deliberately simplistic
//! vulnerable handlers; that corpus is thin glue and lives with the HTTP
//! layer. `demo` is a minimal stand-in that exercises the sink
//! instrumentation convention end to end: every module in this directory is
//! a valid `report()` call site.

pub mod demo;
