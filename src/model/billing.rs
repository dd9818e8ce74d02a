use regex::Regex;
use std::result::Result as DefaultResult;

use crate::api::dto::{BillingErrorDto, BillingFieldErrorReason, BillingInfoDto};
use crate::constant::REGEX_EMAIL_RFC5322;

// customer-supplied snapshot, created fresh per checkout session and
// not persisted beyond order submission
#[derive(Debug, Clone)]
pub struct BillingInfoModel {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub identification: String,
    pub address: String,
    pub city: String,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
}

impl From<BillingInfoModel> for BillingInfoDto {
    fn from(value: BillingInfoModel) -> BillingInfoDto {
        BillingInfoDto {
            full_name: value.full_name,
            email: value.email,
            phone: value.phone,
            identification: value.identification,
            address: value.address,
            city: value.city,
            province: value.province,
            postal_code: value.postal_code,
            country: value.country,
        }
    }
}

impl TryFrom<BillingInfoDto> for BillingInfoModel {
    type Error = BillingErrorDto;
    fn try_from(value: BillingInfoDto) -> DefaultResult<Self, Self::Error> {
        let error = Self::Error {
            full_name: Self::check_required(value.full_name.as_str()),
            email: Self::check_email(value.email.as_str()),
            phone: Self::check_phone(value.phone.as_str()),
            identification: Self::check_required(value.identification.as_str()),
            address: Self::check_required(value.address.as_str()),
            city: Self::check_required(value.city.as_str()),
        };
        if error.full_name.is_none()
            && error.email.is_none()
            && error.phone.is_none()
            && error.identification.is_none()
            && error.address.is_none()
            && error.city.is_none()
        {
            Ok(Self {
                full_name: value.full_name,
                email: value.email,
                phone: value.phone,
                identification: value.identification,
                address: value.address,
                city: value.city,
                province: value.province,
                postal_code: value.postal_code,
                country: value.country,
            })
        } else {
            Err(error)
        }
    } // end of fn try_from
}

impl BillingInfoModel {
    fn check_required(value: &str) -> Option<BillingFieldErrorReason> {
        if value.trim().is_empty() {
            Some(BillingFieldErrorReason::Empty)
        } else {
            None
        }
    }

    fn check_email(value: &str) -> Option<BillingFieldErrorReason> {
        if value.trim().is_empty() {
            return Some(BillingFieldErrorReason::Empty);
        }
        let re = Regex::new(REGEX_EMAIL_RFC5322).unwrap();
        if let Some(_v) = re.find(value) {
            if _v.start() == 0 && value.len() == _v.end() {
                None // given data should match the mail pattern exactly once
            } else {
                Some(BillingFieldErrorReason::InvalidFormat)
            }
        } else {
            Some(BillingFieldErrorReason::InvalidFormat)
        }
    }

    fn check_phone(value: &str) -> Option<BillingFieldErrorReason> {
        if value.trim().is_empty() {
            return Some(BillingFieldErrorReason::Empty);
        }
        // optional leading `+`, the rest has to be digits
        let digits = value.strip_prefix('+').unwrap_or(value);
        let all_digits = !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit());
        if all_digits {
            None
        } else {
            Some(BillingFieldErrorReason::InvalidFormat)
        }
    }
} // end of impl BillingInfoModel
