use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("admin error: {0}")]
    Admin(#[from] svote_admin::AdminError),

    #[error("farm error: {0}")]
    Farm(#[from] svote_farm::FarmError),

    #[error("payment error: {0}")]
    Payment(#[from] svote_payments::PaymentError),

    #[error("index error: {0}")]
    Index(#[from] svote_index::IndexError),
}
