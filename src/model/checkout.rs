use std::result::Result as DefaultResult;

use crate::api::dto::{
    BillingErrorDto, BillingInfoDto, CardErrorDto, CardFieldErrorReason, PaymentMethodDto,
};
use crate::constant::checkout as checkout_limit;

use super::billing::BillingInfoModel;
use super::cart::CartModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    Cart,
    Billing,
    Payment,
    Confirmation,
}

#[derive(Debug, Clone)]
pub struct CardInfoModel {
    pub number: String,
    pub expiry: String,
    pub cvv: String,
}

#[derive(Debug, Clone)]
pub enum PaymentMethodModel {
    Card(CardInfoModel),
    Wallet,
    BankTransfer,
    Crypto,
    QrCode,
}

impl PaymentMethodModel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Card(_) => "card",
            Self::Wallet => "wallet",
            Self::BankTransfer => "banktransfer",
            Self::Crypto => "crypto",
            Self::QrCode => "qrcode",
        }
    }
}

// format checks apply to card data only, the other methods are settled
// outside the client and always pass this guard
impl TryFrom<PaymentMethodDto> for PaymentMethodModel {
    type Error = CardErrorDto;
    fn try_from(value: PaymentMethodDto) -> DefaultResult<Self, Self::Error> {
        match value {
            PaymentMethodDto::Card {
                number,
                expiry,
                cvv,
            } => {
                let error = Self::Error {
                    number: check_card_number(number.as_str()),
                    expiry: check_card_expiry(expiry.as_str()),
                    cvv: check_card_cvv(cvv.as_str()),
                };
                if error.number.is_none() && error.expiry.is_none() && error.cvv.is_none() {
                    Ok(Self::Card(CardInfoModel {
                        number,
                        expiry,
                        cvv,
                    }))
                } else {
                    Err(error)
                }
            }
            PaymentMethodDto::Wallet => Ok(Self::Wallet),
            PaymentMethodDto::BankTransfer => Ok(Self::BankTransfer),
            PaymentMethodDto::Crypto => Ok(Self::Crypto),
            PaymentMethodDto::QrCode => Ok(Self::QrCode),
        }
    }
}

fn check_card_number(value: &str) -> Option<CardFieldErrorReason> {
    let digits = value.replace(' ', "");
    if digits.is_empty() {
        Some(CardFieldErrorReason::Empty)
    } else if digits.len() < checkout_limit::CARD_NUM_DIGITS_MIN
        || digits.len() > checkout_limit::CARD_NUM_DIGITS_MAX
        || !digits.chars().all(|c| c.is_ascii_digit())
    {
        Some(CardFieldErrorReason::InvalidFormat)
    } else {
        None
    }
}

// MM/YY, month 01 to 12
fn check_card_expiry(value: &str) -> Option<CardFieldErrorReason> {
    if value.is_empty() {
        return Some(CardFieldErrorReason::Empty);
    }
    let mut tokens = value.split('/');
    let (mm, yy) = (tokens.next(), tokens.next());
    if tokens.next().is_some() {
        return Some(CardFieldErrorReason::InvalidFormat);
    }
    match (mm, yy) {
        (Some(m), Some(y)) if m.len() == 2 && y.len() == 2 => {
            let month_ok = matches!(m.parse::<u8>(), Ok(v) if (1..=12).contains(&v));
            let year_ok = y.chars().all(|c| c.is_ascii_digit());
            if month_ok && year_ok {
                None
            } else {
                Some(CardFieldErrorReason::InvalidFormat)
            }
        }
        _others => Some(CardFieldErrorReason::InvalidFormat),
    }
}

fn check_card_cvv(value: &str) -> Option<CardFieldErrorReason> {
    if value.is_empty() {
        Some(CardFieldErrorReason::Empty)
    } else if !(3..=4).contains(&value.len()) || !value.chars().all(|c| c.is_ascii_digit()) {
        Some(CardFieldErrorReason::InvalidFormat)
    } else {
        None
    }
}

#[derive(Debug)]
pub enum CheckoutStepError {
    EmptyCart,
    BillingValidation(BillingErrorDto),
    PaymentValidation(CardErrorDto),
    MissingBilling,
    AlreadySubmitting,
    // current step does not allow the requested transition
    StepMismatch(CheckoutStep),
    SessionCompleted,
}

// transient per-checkout-attempt state, discarded after Confirmation or
// on navigation away, the cart itself outlives it
pub struct CheckoutSessionModel {
    pub session: String,
    step: CheckoutStep,
    pub billing: Option<BillingInfoModel>,
    pub payment_method: Option<PaymentMethodModel>,
    submitting: bool,
}

impl CheckoutSessionModel {
    pub fn new(session: String) -> Self {
        Self {
            session,
            step: CheckoutStep::Cart,
            billing: None,
            payment_method: None,
            submitting: false,
        }
    }

    pub fn curr_step(&self) -> CheckoutStep {
        self.step
    }

    pub fn advance_to_billing(&mut self, cart: &CartModel) -> DefaultResult<(), CheckoutStepError> {
        match self.step {
            CheckoutStep::Cart => {
                if cart.is_empty() {
                    Err(CheckoutStepError::EmptyCart)
                } else {
                    self.step = CheckoutStep::Billing;
                    Ok(())
                }
            }
            CheckoutStep::Confirmation => Err(CheckoutStepError::SessionCompleted),
            _others => Err(CheckoutStepError::StepMismatch(self.step)),
        }
    }

    pub fn advance_to_payment(
        &mut self,
        data: BillingInfoDto,
    ) -> DefaultResult<(), CheckoutStepError> {
        match self.step {
            CheckoutStep::Billing => {
                let m = BillingInfoModel::try_from(data)
                    .map_err(CheckoutStepError::BillingValidation)?;
                self.billing = Some(m);
                self.step = CheckoutStep::Payment;
                Ok(())
            }
            CheckoutStep::Confirmation => Err(CheckoutStepError::SessionCompleted),
            _others => Err(CheckoutStepError::StepMismatch(self.step)),
        }
    }

    // entering the submitting sub-state disables any further trigger
    // until `complete_submission` or `abort_submission` runs
    pub fn begin_submission(
        &mut self,
        method: PaymentMethodDto,
    ) -> DefaultResult<(PaymentMethodModel, BillingInfoModel), CheckoutStepError> {
        match self.step {
            CheckoutStep::Payment => {
                if self.submitting {
                    return Err(CheckoutStepError::AlreadySubmitting);
                }
                let method_m = PaymentMethodModel::try_from(method)
                    .map_err(CheckoutStepError::PaymentValidation)?;
                let billing = self
                    .billing
                    .clone()
                    .ok_or(CheckoutStepError::MissingBilling)?;
                self.payment_method = Some(method_m.clone());
                self.submitting = true;
                Ok((method_m, billing))
            }
            CheckoutStep::Confirmation => Err(CheckoutStepError::SessionCompleted),
            _others => Err(CheckoutStepError::StepMismatch(self.step)),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn complete_submission(&mut self) {
        self.submitting = false;
        self.step = CheckoutStep::Confirmation;
    }

    pub fn abort_submission(&mut self) {
        self.submitting = false;
    }

    // backward navigation never revalidates steps already passed
    pub fn step_back(&mut self) -> DefaultResult<CheckoutStep, CheckoutStepError> {
        if self.submitting {
            return Err(CheckoutStepError::AlreadySubmitting);
        }
        match self.step {
            CheckoutStep::Confirmation => Err(CheckoutStepError::SessionCompleted),
            CheckoutStep::Payment => {
                self.step = CheckoutStep::Billing;
                Ok(self.step)
            }
            CheckoutStep::Billing => {
                self.step = CheckoutStep::Cart;
                Ok(self.step)
            }
            CheckoutStep::Cart => Ok(self.step),
        }
    }
} // end of impl CheckoutSessionModel
