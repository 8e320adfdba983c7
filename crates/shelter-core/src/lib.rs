//! shelter-core
//!
//! Core building blocks for an offline-caching agent.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（request, response, version, manifest, state, outcome, errors）
//! - **ports**: 抽象化レイヤー（CacheStorage, Network, ClientControl, Clock, IdGenerator）
//! - **app**: アプリケーションロジック（config, builder, agent, install, activate, fetch, status）
//! - **impls**: 実装（InMemoryCacheStorage, HttpNetwork, StaticNetwork など）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
