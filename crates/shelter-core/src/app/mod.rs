//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせて agent のライフサイクルを実装します。
//!
//! # 主要コンポーネント
//! - **AgentConfig**: 起動時に注入する設定（バージョン名・アセット一覧）
//! - **AgentBuilder**: agent の構築とワイヤリング
//! - **Agent**: install / activate / fetch の 3 ハンドラ
//! - **AgentStatus**: カウンタとストアの状態

pub mod activate;
pub mod agent;
pub mod builder;
pub mod config;
pub mod fetch;
pub mod install;
pub mod status;

pub use self::activate::ActivationReport;
pub use self::agent::Agent;
pub use self::builder::{AgentBuilder, BuildError};
pub use self::config::{AgentConfig, ConfigError};
pub use self::install::InstallReport;
pub use self::status::{AgentStats, AgentStatus, StatsSnapshot};
