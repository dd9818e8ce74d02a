use std::boxed::Box;
use std::sync::Arc;

use crate::api::dto::{
    AmountSummaryDto, CartDto, CartLineDto, CouponDto, ProductKindDto, ShippingSelectionDto,
};
use crate::constant::limit;
use crate::error::AppError;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::{LineIdentity, PriceQuoteModel, ShippingSelectionModel};
use crate::repository::{AbsCartRepo, AbsCouponRepo};

pub enum AddCartLineUcResult {
    Success,
    ExceedLimit { given: usize, max: usize },
    ServerError(AppError),
}

pub struct AddCartLineUseCase {
    pub repo: Box<dyn AbsCartRepo>,
    pub log_ctx: Arc<AppLogContext>,
}

impl AddCartLineUseCase {
    pub async fn execute(self, session: &str, data: CartLineDto) -> AddCartLineUcResult {
        // held across the read-modify-write, a concurrent mutation of
        // the same session waits here instead of overwriting this one
        let _wr_guard = match self.repo.lock_session(session).await {
            Ok(v) => v,
            Err(e) => return self.report_error(session, e),
        };
        let mut cart = match self.repo.fetch_cart(session).await {
            Ok(v) => v,
            Err(e) => return self.report_error(session, e),
        };
        cart.add_line(data);
        let num_lines = cart.num_lines();
        if num_lines > limit::MAX_LINES_PER_CART {
            return AddCartLineUcResult::ExceedLimit {
                given: num_lines,
                max: limit::MAX_LINES_PER_CART,
            };
        }
        match self.repo.update(cart).await {
            Ok(_num) => AddCartLineUcResult::Success,
            Err(e) => self.report_error(session, e),
        }
    }

    fn report_error(&self, session: &str, e: AppError) -> AddCartLineUcResult {
        let logctx_p = &self.log_ctx;
        app_log_event!(logctx_p, AppLogLevel::ERROR, "session:{}, {:?}", session, e);
        AddCartLineUcResult::ServerError(e)
    }
} // end of impl AddCartLineUseCase

pub enum RemoveCartLineUcResult {
    Success,
    // absence is reported but treated as non-fatal by callers
    NotFound,
    ServerError(AppError),
}

pub struct RemoveCartLineUseCase {
    pub repo: Box<dyn AbsCartRepo>,
    pub log_ctx: Arc<AppLogContext>,
}

impl RemoveCartLineUseCase {
    pub async fn execute(
        self,
        session: &str,
        product_id: u64,
        kind: ProductKindDto,
    ) -> RemoveCartLineUcResult {
        let id_ = LineIdentity {
            product_id,
            kind: kind.into(),
        };
        let _wr_guard = match self.repo.lock_session(session).await {
            Ok(v) => v,
            Err(e) => return self.report_error(session, e),
        };
        let mut cart = match self.repo.fetch_cart(session).await {
            Ok(v) => v,
            Err(e) => return self.report_error(session, e),
        };
        if !cart.remove_line(&id_) {
            return RemoveCartLineUcResult::NotFound;
        }
        match self.repo.update(cart).await {
            Ok(_num) => RemoveCartLineUcResult::Success,
            Err(e) => self.report_error(session, e),
        }
    }

    fn report_error(&self, session: &str, e: AppError) -> RemoveCartLineUcResult {
        let logctx_p = &self.log_ctx;
        app_log_event!(logctx_p, AppLogLevel::ERROR, "session:{}, {:?}", session, e);
        RemoveCartLineUcResult::ServerError(e)
    }
} // end of impl RemoveCartLineUseCase

pub enum SetLineQuantityUcResult {
    Success,
    NotFound,
    ServerError(AppError),
}

pub struct SetLineQuantityUseCase {
    pub repo: Box<dyn AbsCartRepo>,
    pub log_ctx: Arc<AppLogContext>,
}

impl SetLineQuantityUseCase {
    pub async fn execute(
        self,
        session: &str,
        product_id: u64,
        kind: ProductKindDto,
        quantity: u32,
    ) -> SetLineQuantityUcResult {
        let id_ = LineIdentity {
            product_id,
            kind: kind.into(),
        };
        let _wr_guard = match self.repo.lock_session(session).await {
            Ok(v) => v,
            Err(e) => return self.report_error(session, e),
        };
        let mut cart = match self.repo.fetch_cart(session).await {
            Ok(v) => v,
            Err(e) => return self.report_error(session, e),
        };
        if !cart.set_quantity(&id_, quantity) {
            return SetLineQuantityUcResult::NotFound;
        }
        match self.repo.update(cart).await {
            Ok(_num) => SetLineQuantityUcResult::Success,
            Err(e) => self.report_error(session, e),
        }
    }

    fn report_error(&self, session: &str, e: AppError) -> SetLineQuantityUcResult {
        let logctx_p = &self.log_ctx;
        app_log_event!(logctx_p, AppLogLevel::ERROR, "session:{}, {:?}", session, e);
        SetLineQuantityUcResult::ServerError(e)
    }
} // end of impl SetLineQuantityUseCase

pub enum DiscardCartUcResult {
    Success,
    ServerError(AppError),
}

pub struct DiscardCartUseCase {
    pub repo: Box<dyn AbsCartRepo>,
    pub log_ctx: Arc<AppLogContext>,
}

impl DiscardCartUseCase {
    pub async fn execute(self, session: &str) -> DiscardCartUcResult {
        let locked = self.repo.lock_session(session).await;
        let result = match locked {
            Ok(_wr_guard) => self.repo.discard(session).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => DiscardCartUcResult::Success,
            Err(e) => {
                let logctx_p = &self.log_ctx;
                app_log_event!(logctx_p, AppLogLevel::ERROR, "session:{}, {:?}", session, e);
                DiscardCartUcResult::ServerError(e)
            }
        }
    }
}

pub enum ApplyCouponUcResult {
    // the stored coupon after the operation, in presentation shape
    Applied(CouponDto),
    // unknown codes never modify the cart
    Rejected,
    ServerError(AppError),
}

pub struct ApplyCouponUseCase {
    pub cart_repo: Box<dyn AbsCartRepo>,
    pub coupon_repo: Box<dyn AbsCouponRepo>,
    pub log_ctx: Arc<AppLogContext>,
}

impl ApplyCouponUseCase {
    pub async fn execute(self, session: &str, code: &str) -> ApplyCouponUcResult {
        let maybe_coupon = match self.coupon_repo.fetch_by_code(code).await {
            Ok(v) => v,
            Err(e) => return self.report_error(session, e),
        };
        let Some(coupon) = maybe_coupon else {
            return ApplyCouponUcResult::Rejected;
        };
        let _wr_guard = match self.cart_repo.lock_session(session).await {
            Ok(v) => v,
            Err(e) => return self.report_error(session, e),
        };
        let mut cart = match self.cart_repo.fetch_cart(session).await {
            Ok(v) => v,
            Err(e) => return self.report_error(session, e),
        };
        cart.apply_coupon(coupon.clone());
        match self.cart_repo.update(cart).await {
            Ok(_num) => ApplyCouponUcResult::Applied(coupon.into()),
            Err(e) => self.report_error(session, e),
        }
    }

    fn report_error(&self, session: &str, e: AppError) -> ApplyCouponUcResult {
        let logctx_p = &self.log_ctx;
        app_log_event!(logctx_p, AppLogLevel::ERROR, "session:{}, {:?}", session, e);
        ApplyCouponUcResult::ServerError(e)
    }
} // end of impl ApplyCouponUseCase

pub enum RemoveCouponUcResult {
    Success,
    ServerError(AppError),
}

pub struct RemoveCouponUseCase {
    pub repo: Box<dyn AbsCartRepo>,
    pub log_ctx: Arc<AppLogContext>,
}

impl RemoveCouponUseCase {
    pub async fn execute(self, session: &str) -> RemoveCouponUcResult {
        let _wr_guard = match self.repo.lock_session(session).await {
            Ok(v) => v,
            Err(e) => return self.report_error(session, e),
        };
        let mut cart = match self.repo.fetch_cart(session).await {
            Ok(v) => v,
            Err(e) => return self.report_error(session, e),
        };
        // removing from a cart without a coupon converges to the same state
        let _prev = cart.remove_coupon();
        match self.repo.update(cart).await {
            Ok(_num) => RemoveCouponUcResult::Success,
            Err(e) => self.report_error(session, e),
        }
    }

    fn report_error(&self, session: &str, e: AppError) -> RemoveCouponUcResult {
        let logctx_p = &self.log_ctx;
        app_log_event!(logctx_p, AppLogLevel::ERROR, "session:{}, {:?}", session, e);
        RemoveCouponUcResult::ServerError(e)
    }
} // end of impl RemoveCouponUseCase

pub enum SelectShippingUcResult {
    Success,
    ServerError(AppError),
}

pub struct SelectShippingUseCase {
    pub repo: Box<dyn AbsCartRepo>,
    pub log_ctx: Arc<AppLogContext>,
}

impl SelectShippingUseCase {
    pub async fn execute(self, session: &str, data: ShippingSelectionDto) -> SelectShippingUcResult {
        let _wr_guard = match self.repo.lock_session(session).await {
            Ok(v) => v,
            Err(e) => return self.report_error(session, e),
        };
        let mut cart = match self.repo.fetch_cart(session).await {
            Ok(v) => v,
            Err(e) => return self.report_error(session, e),
        };
        cart.select_shipping(ShippingSelectionModel::from(data));
        match self.repo.update(cart).await {
            Ok(_num) => SelectShippingUcResult::Success,
            Err(e) => self.report_error(session, e),
        }
    }

    fn report_error(&self, session: &str, e: AppError) -> SelectShippingUcResult {
        let logctx_p = &self.log_ctx;
        app_log_event!(logctx_p, AppLogLevel::ERROR, "session:{}, {:?}", session, e);
        SelectShippingUcResult::ServerError(e)
    }
} // end of impl SelectShippingUseCase

pub enum RetrieveCartUcResult {
    Success {
        cart: CartDto,
        amount: AmountSummaryDto,
    },
    ServerError(AppError),
}

pub struct RetrieveCartUseCase {
    pub repo: Box<dyn AbsCartRepo>,
    pub tax_rate_percent: u8,
    pub log_ctx: Arc<AppLogContext>,
}

impl RetrieveCartUseCase {
    pub async fn execute(self, session: &str) -> RetrieveCartUcResult {
        match self.repo.fetch_cart(session).await {
            Ok(cart) => {
                let quote = PriceQuoteModel::evaluate(&cart, self.tax_rate_percent);
                RetrieveCartUcResult::Success {
                    cart: CartDto::from(cart),
                    amount: quote.into(),
                }
            }
            Err(e) => {
                let logctx_p = &self.log_ctx;
                app_log_event!(logctx_p, AppLogLevel::ERROR, "session:{}, {:?}", session, e);
                RetrieveCartUcResult::ServerError(e)
            }
        }
    }
} // end of impl RetrieveCartUseCase
