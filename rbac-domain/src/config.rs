//! 启动配置
//!
//! 目前只包含发号器的 worker id。来源（按优先级）：环境变量 `RBAC_WORKER_ID`、TOML 文件。
//! 缺失或非法的配置一律作为启动错误返回，不回退默认值。
//!
//! ```toml
//! [id_generator]
//! worker_id = 1
//! ```
//!
use crate::error::{DomainError, DomainResult};
use crate::snowflake::IdGenerator;
use crate::value_object::WorkerId;
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// worker id 环境变量名
pub const WORKER_ID_ENV: &str = "RBAC_WORKER_ID";

/// 发号器配置
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdGeneratorSettings {
    worker_id: i64,
}

impl IdGeneratorSettings {
    pub fn worker_id(&self) -> i64 {
        self.worker_id
    }
}

/// 全局配置
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    id_generator: IdGeneratorSettings,
}

impl Settings {
    pub fn id_generator(&self) -> &IdGeneratorSettings {
        &self.id_generator
    }

    /// 解析 TOML 文本并校验
    pub fn from_toml_str(text: &str) -> DomainResult<Self> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| DomainError::Config {
            reason: format!("cannot read {}: {err}", path.display()),
        })?;
        Self::from_toml_str(&text)
    }

    /// 从进程环境读取 `RBAC_WORKER_ID`
    pub fn from_env() -> DomainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取（便于注入与测试）
    pub fn from_lookup<F>(lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup(WORKER_ID_ENV).ok_or_else(|| DomainError::Config {
            reason: format!("{WORKER_ID_ENV} is not set"),
        })?;
        let worker_id: i64 = raw.trim().parse()?;
        let settings = Settings::builder()
            .id_generator(IdGeneratorSettings::builder().worker_id(worker_id).build())
            .build();
        settings.validate()?;
        Ok(settings)
    }

    /// 环境变量优先，其次为给定文件；两者都没有时报错
    pub fn load(path: Option<&Path>) -> DomainResult<Self> {
        if std::env::var_os(WORKER_ID_ENV).is_some() {
            return Self::from_env();
        }
        match path {
            Some(path) => Self::from_file(path),
            None => Err(DomainError::Config {
                reason: format!("neither {WORKER_ID_ENV} nor a settings file was provided"),
            }),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        WorkerId::new(self.id_generator.worker_id).map(|_| ())
    }

    /// 按配置构造系统时钟发号器
    pub fn build_generator(&self) -> DomainResult<IdGenerator> {
        let generator = IdGenerator::new(self.id_generator.worker_id)?;
        info!(worker_id = %generator.worker_id(), "id generator ready");
        Ok(generator)
    }
}
