use std::collections::hash_map::RandomState;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::result::Result as DefaultResult;

use rust_decimal::Decimal;
use serde::de::{Error as DeserializeError, Expected};
use serde::Deserialize;

use crate::constant as AppConst;
use crate::error::{AppError, AppErrorCode};
use crate::AppLogAlias;

#[derive(Deserialize)]
pub struct AppLogHandlerCfg {
    pub min_level: AppConst::logging::Level,
    pub destination: AppConst::logging::Destination,
    pub alias: AppLogAlias,
    pub path: Option<String>,
}

#[derive(Deserialize)]
pub struct AppLoggerCfg {
    pub alias: AppLogAlias,
    pub handlers: Vec<String>,
    pub level: Option<AppConst::logging::Level>,
}

#[derive(Deserialize)]
pub struct AppLoggingCfg {
    pub handlers: Vec<AppLogHandlerCfg>,
    pub loggers: Vec<AppLoggerCfg>,
}

#[derive(Deserialize, Debug)]
pub struct AppInMemoryDbCfg {
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub alias: String,
    pub max_items: u32,
}

#[derive(Deserialize, Debug)]
pub struct AppLocalFsSlotCfg {
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub alias: String,
    // relative to the service base path, holds one JSON document keyed
    // by slot label, e.g. `cart-{session}`
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub rel_path: String,
}

#[allow(non_camel_case_types)]
#[derive(Deserialize)]
#[serde(tag = "_type")]
pub enum AppDataStoreCfg {
    InMemory(AppInMemoryDbCfg),
    LocalFs(AppLocalFsSlotCfg),
}

#[derive(Deserialize)]
pub struct AppPaymentProcessorCfg {
    // the processor is simulated, the delay stands in for a round trip
    // to a real payment gateway
    pub processing_delay_ms: u64,
    pub decline_all: bool,
}

#[derive(Deserialize, Clone)]
pub struct AppSideEffectRetryCfg {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

#[derive(Deserialize)]
pub struct AppCouponCfg {
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub code: String,
    pub kind: AppCouponKindCfg,
    pub value: Decimal,
}

#[derive(Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum AppCouponKindCfg {
    Percentage,
    Fixed,
    FreeShipping,
}

#[derive(Deserialize)]
pub struct AppCheckoutServiceCfg {
    pub logging: AppLoggingCfg,
    pub data_store: Vec<AppDataStoreCfg>,
    pub payment_processor: AppPaymentProcessorCfg,
    pub side_effect_retry: AppSideEffectRetryCfg,
    pub tax_rate_percent: u8,
    pub coupons: Vec<AppCouponCfg>,
}

pub struct AppBasepathCfg {
    pub system: String,
    pub service: String,
}

pub struct AppConfig {
    pub basepath: AppBasepathCfg,
    pub service: AppCheckoutServiceCfg,
}

impl AppConfig {
    pub fn new(mut args: HashMap<String, String, RandomState>) -> DefaultResult<Self, AppError> {
        let sys_basepath = if let Some(s) = args.remove(AppConst::ENV_VAR_SYS_BASE_PATH) {
            s + "/"
        } else {
            return Err(AppError {
                detail: None,
                code: AppErrorCode::MissingSysBasePath,
            });
        };
        let app_basepath = if let Some(a) = args.remove(AppConst::ENV_VAR_SERVICE_BASE_PATH) {
            a + "/"
        } else {
            return Err(AppError {
                detail: None,
                code: AppErrorCode::MissingAppBasePath,
            });
        };
        let srv_cfg = if let Some(cfg_path) = args.remove(AppConst::ENV_VAR_CONFIG_FILE_PATH) {
            let fullpath = app_basepath.clone() + &cfg_path;
            Self::parse_from_file(fullpath)?
        } else {
            return Err(AppError {
                detail: None,
                code: AppErrorCode::MissingConfigPath,
            });
        };
        Ok(Self {
            service: srv_cfg,
            basepath: AppBasepathCfg {
                system: sys_basepath,
                service: app_basepath,
            },
        })
    } // end of fn new

    // load and parse a config file with given path
    pub fn parse_from_file(filepath: String) -> DefaultResult<AppCheckoutServiceCfg, AppError> {
        match File::open(filepath) {
            Ok(fileobj) => {
                let reader = BufReader::new(fileobj);
                match serde_json::from_reader::<BufReader<File>, AppCheckoutServiceCfg>(reader) {
                    Ok(jsnobj) => {
                        Self::_check_logging(&jsnobj.logging)?;
                        Self::_check_datastore(&jsnobj.data_store)?;
                        Self::_check_processor(&jsnobj.payment_processor)?;
                        Self::_check_retry(&jsnobj.side_effect_retry)?;
                        Ok(jsnobj)
                    }
                    Err(e) => Err(AppError {
                        detail: Some(e.to_string()),
                        code: AppErrorCode::InvalidJsonFormat,
                    }),
                }
            }
            Err(e) => Err(AppError {
                detail: Some(e.to_string()),
                code: AppErrorCode::IOerror(e.kind()),
            }),
        }
    }

    fn _check_logging(obj: &AppLoggingCfg) -> DefaultResult<(), AppError> {
        let mut no_hdlr_logger = obj.loggers.iter().filter(|item| item.handlers.is_empty());
        // for file-type handler, the field `path` has to be provided
        let mut fs_no_path = obj.handlers.iter().filter(|item| {
            matches!(
                &item.destination,
                AppConst::logging::Destination::LOCALFS
            ) && item.path.is_none()
        });
        let mut unnamed_hdlr = obj.handlers.iter().filter(|item| item.alias.is_empty());
        let mut unnamed_logger = obj.loggers.iter().filter(|item| item.alias.is_empty());
        if obj.handlers.is_empty() {
            Err(AppError {
                detail: None,
                code: AppErrorCode::NoLogHandlerCfg,
            })
        } else if obj.loggers.is_empty() {
            Err(AppError {
                detail: None,
                code: AppErrorCode::NoLoggerCfg,
            })
        } else if let Some(alogger) = no_hdlr_logger.next() {
            let msg = format!("the logger does not have handler: {}", alogger.alias);
            Err(AppError {
                detail: Some(msg),
                code: AppErrorCode::NoHandlerInLoggerCfg,
            })
        } else if unnamed_hdlr.next().is_some() {
            Err(AppError {
                detail: None,
                code: AppErrorCode::MissingAliasLogHdlerCfg,
            })
        } else if unnamed_logger.next().is_some() {
            Err(AppError {
                detail: None,
                code: AppErrorCode::MissingAliasLoggerCfg,
            })
        } else if let Some(badhdlr) = fs_no_path.next() {
            let msg = format!("file-type handler does not contain path: {}", badhdlr.alias);
            Err(AppError {
                detail: Some(msg),
                code: AppErrorCode::InvalidHandlerLoggerCfg,
            })
        } else {
            let iter = obj.handlers.iter().map(|i| i.alias.as_str());
            let hdlr_alias_map: HashSet<&str> = HashSet::from_iter(iter);
            // handler alias in each logger has to be present
            let mut bad_ref = obj.loggers.iter().filter(|item| {
                item.handlers
                    .iter()
                    .any(|i| !hdlr_alias_map.contains(i.as_str()))
            });
            if let Some(alogger) = bad_ref.next() {
                let msg = format!(
                    "the logger contains invalid handler alias: {}",
                    alogger.alias
                );
                Err(AppError {
                    detail: Some(msg),
                    code: AppErrorCode::InvalidHandlerLoggerCfg,
                })
            } else {
                Ok(())
            }
        }
    } // end of fn _check_logging

    fn _check_datastore(obj: &Vec<AppDataStoreCfg>) -> DefaultResult<(), AppError> {
        if obj.is_empty() {
            return Err(AppError {
                detail: None,
                code: AppErrorCode::MissingDataStore,
            });
        }
        for item in obj {
            if let AppDataStoreCfg::InMemory(c) = item {
                let lmt = AppConst::limit::MAX_ITEMS_STORED_PER_MODEL;
                if c.max_items > lmt {
                    let e = AppError {
                        detail: Some(format!("limit:{}", lmt)),
                        code: AppErrorCode::ExceedingMaxLimit,
                    };
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    fn _check_processor(obj: &AppPaymentProcessorCfg) -> DefaultResult<(), AppError> {
        let lmt = AppConst::limit::MAX_SECONDS_PROCESSOR_DELAY * 1000;
        if obj.processing_delay_ms > lmt {
            Err(AppError {
                detail: Some(format!("limit-delay-ms:{}", lmt)),
                code: AppErrorCode::ExceedingMaxLimit,
            })
        } else {
            Ok(())
        }
    }

    fn _check_retry(obj: &AppSideEffectRetryCfg) -> DefaultResult<(), AppError> {
        let lmt = AppConst::limit::MAX_SIDE_EFFECT_ATTEMPTS;
        if obj.max_attempts == 0 {
            Err(AppError {
                detail: Some("max-attempts:0".to_string()),
                code: AppErrorCode::InvalidInput,
            })
        } else if obj.max_attempts > lmt {
            Err(AppError {
                detail: Some(format!("limit-attempts:{}", lmt)),
                code: AppErrorCode::ExceedingMaxLimit,
            })
        } else {
            Ok(())
        }
    }
} // end of impl AppConfig

struct ExpectNonEmptyString {
    min_len: u32,
}

impl Expected for ExpectNonEmptyString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        let msg = format!("minimum string length >= {}", self.min_len);
        formatter.write_str(msg.as_str())
    }
}

fn jsn_deny_empty_string<'de, D>(raw: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match String::deserialize(raw) {
        Ok(s) => {
            if s.is_empty() {
                let unexp = s.len();
                let exp = ExpectNonEmptyString { min_len: 1 };
                let e = DeserializeError::invalid_length(unexp, &exp);
                Err(e)
            } else {
                Ok(s)
            }
        }
        Err(e) => Err(e),
    }
}
