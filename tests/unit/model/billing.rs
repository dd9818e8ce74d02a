use storefront_checkout::api::dto::BillingFieldErrorReason;
use storefront_checkout::model::BillingInfoModel;

use super::ut_valid_billing_dto;

#[test]
fn convert_ok() {
    let data = ut_valid_billing_dto();
    let result = BillingInfoModel::try_from(data.clone());
    assert!(result.is_ok());
    let m = result.unwrap();
    assert_eq!(m.full_name, data.full_name);
    assert_eq!(m.email, data.email);
    assert_eq!(m.province, data.province);
}

#[test]
fn required_fields_empty() {
    let mut data = ut_valid_billing_dto();
    data.full_name = "   ".to_string();
    data.identification = "".to_string();
    data.city = "".to_string();
    let result = BillingInfoModel::try_from(data);
    assert!(result.is_err());
    let e = result.unwrap_err();
    assert_eq!(e.full_name, Some(BillingFieldErrorReason::Empty));
    assert_eq!(e.identification, Some(BillingFieldErrorReason::Empty));
    assert_eq!(e.city, Some(BillingFieldErrorReason::Empty));
    assert!(e.email.is_none());
    assert!(e.address.is_none());
}

#[test]
fn email_format_invalid() {
    let mut data = ut_valid_billing_dto();
    data.email = "someone@@nowhere".to_string();
    let result = BillingInfoModel::try_from(data);
    let e = result.unwrap_err();
    assert_eq!(e.email, Some(BillingFieldErrorReason::InvalidFormat));

    let mut data = ut_valid_billing_dto();
    data.email = "prefix text jovana@proton.me".to_string();
    let result = BillingInfoModel::try_from(data);
    let e = result.unwrap_err();
    assert_eq!(e.email, Some(BillingFieldErrorReason::InvalidFormat));
}

#[test]
fn phone_format() {
    let mut data = ut_valid_billing_dto();
    data.phone = "0641234567".to_string();
    assert!(BillingInfoModel::try_from(data).is_ok());

    let mut data = ut_valid_billing_dto();
    data.phone = "+64-123-4567".to_string();
    let e = BillingInfoModel::try_from(data).unwrap_err();
    assert_eq!(e.phone, Some(BillingFieldErrorReason::InvalidFormat));

    let mut data = ut_valid_billing_dto();
    data.phone = "+".to_string();
    let e = BillingInfoModel::try_from(data).unwrap_err();
    assert_eq!(e.phone, Some(BillingFieldErrorReason::InvalidFormat));
}

#[test]
fn optional_fields_absent_ok() {
    let mut data = ut_valid_billing_dto();
    data.province = None;
    data.postal_code = None;
    assert!(BillingInfoModel::try_from(data).is_ok());
}
