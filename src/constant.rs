use std::hash::Hash;
use std::str::FromStr;

use crate::error::{AppError, AppErrorCode};

pub mod app_meta {
    pub const LABEL: &str = "storefront-checkout";
    pub const MACHINE_CODE: u8 = 1;
    // TODO, machine code to UUID generator should be configurable
}

pub const ENV_VAR_SYS_BASE_PATH: &str = "SYS_BASE_PATH";
pub const ENV_VAR_SERVICE_BASE_PATH: &str = "SERVICE_BASE_PATH";
pub const ENV_VAR_CONFIG_FILE_PATH: &str = "CONFIG_FILE_PATH";

pub const EXPECTED_ENV_VAR_LABELS: [&str; 3] = [
    ENV_VAR_SYS_BASE_PATH,
    ENV_VAR_SERVICE_BASE_PATH,
    ENV_VAR_CONFIG_FILE_PATH,
];

pub mod limit {
    pub const MAX_ITEMS_STORED_PER_MODEL: u32 = 2200u32;
    pub const MAX_LINES_PER_CART: usize = 200;
    pub const MAX_SIDE_EFFECT_ATTEMPTS: u32 = 5;
    pub const MAX_SECONDS_PROCESSOR_DELAY: u64 = 30;
}

pub mod checkout {
    // percent, applied to the cart subtotal within the checkout flow
    pub const DEFAULT_TAX_RATE: u8 = 12;
    pub const CARD_NUM_DIGITS_MIN: usize = 13;
    pub const CARD_NUM_DIGITS_MAX: usize = 19;
}

#[derive(Debug, Eq, Hash)]
pub enum ProductKind {
    Product,
    Service,
    Course,
    Ebook,
    Subscription,
    Unknown(u8),
}

impl From<u8> for ProductKind {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Product,
            2 => Self::Service,
            3 => Self::Course,
            4 => Self::Ebook,
            5 => Self::Subscription,
            _others => Self::Unknown(value),
        }
    }
}
impl From<ProductKind> for u8 {
    fn from(value: ProductKind) -> u8 {
        match value {
            ProductKind::Unknown(v) => v,
            ProductKind::Product => 1,
            ProductKind::Service => 2,
            ProductKind::Course => 3,
            ProductKind::Ebook => 4,
            ProductKind::Subscription => 5,
        }
    }
}
impl PartialEq for ProductKind {
    fn eq(&self, other: &Self) -> bool {
        let a: u8 = self.clone().into();
        let b: u8 = other.clone().into();
        a == b
    }
}
impl Clone for ProductKind {
    fn clone(&self) -> Self {
        match self {
            Self::Product => Self::Product,
            Self::Service => Self::Service,
            Self::Course => Self::Course,
            Self::Ebook => Self::Ebook,
            Self::Subscription => Self::Subscription,
            Self::Unknown(v) => Self::Unknown(*v),
        }
    }
}
impl FromStr for ProductKind {
    type Err = AppError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u8>() {
            Ok(v) => Ok(Self::from(v)),
            Err(e) => {
                let detail = format!("product-kind, actual:{}, error:{}", s, e);
                Err(Self::Err {
                    code: AppErrorCode::DataCorruption,
                    detail: Some(detail),
                })
            }
        }
    }
}

pub(crate) const REGEX_EMAIL_RFC5322 : &str = r#"(?:[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?|\[(?:(?:(2(5[0-5]|[0-4][0-9])|1[0-9][0-9]|[1-9]?[0-9]))\.){3}(?:(2(5[0-5]|[0-4][0-9])|1[0-9][0-9]|[1-9]?[0-9])|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])"#;

pub mod logging {
    use serde::Deserialize;

    #[derive(Deserialize, Clone, Copy)]
    pub enum Level {
        TRACE,
        DEBUG,
        INFO,
        WARNING,
        ERROR,
        FATAL,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Destination {
        CONSOLE,
        LOCALFS,
    }
}
