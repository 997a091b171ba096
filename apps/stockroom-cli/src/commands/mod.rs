//! # CLI Commands
//!
//! One function per subcommand. Each takes the open [`Database`] plus its
//! parsed arguments and returns a serializable response or an [`ApiError`].
//!
//! ## Command Categories
//!
//! - **Stock**: `add-item`, `add-dealer`, `item`, `products`, `dealers`,
//!   `customers`
//! - **Sale**: `sell`
//! - **Report**: `report`
//! - **Maintenance**: `init`, `clear`

pub mod maintenance;
pub mod report;
pub mod sale;
pub mod stock;

use serde::Serialize;
use serde_json::Value;
use stockroom_db::Database;

use crate::cli::Command;
use crate::error::ApiError;

/// Runs one subcommand and renders its response as JSON.
pub async fn dispatch(db: &Database, command: Command) -> Result<Value, ApiError> {
    match command {
        Command::Init => to_json(maintenance::init(db).await?),
        Command::AddItem(args) => to_json(stock::add_item(db, args).await?),
        Command::AddDealer(args) => to_json(stock::add_dealer(db, args).await?),
        Command::Item(args) => to_json(stock::get_item(db, args).await?),
        Command::Products => to_json(stock::list_products(db).await?),
        Command::Dealers => to_json(stock::dealer_names(db).await?),
        Command::Customers => to_json(stock::customer_names(db).await?),
        Command::Sell(args) => to_json(sale::sell(db, args).await?),
        Command::Report(args) => to_json(report::build_report(db, args).await?),
        Command::Clear(args) => to_json(maintenance::clear(db, args).await?),
    }
}

fn to_json(response: impl Serialize) -> Result<Value, ApiError> {
    serde_json::to_value(response).map_err(|e| ApiError::internal(e.to_string()))
}

/// Renders [`Money`](stockroom_core::Money) the way it is typed on the
/// command line (`"12.50"`), not as minor units.
pub(crate) mod decimal {
    use serde::Serializer;
    use stockroom_core::Money;

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(money)
    }

    pub fn serialize_option<S: Serializer>(
        money: &Option<Money>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match money {
            Some(money) => serializer.collect_str(money),
            None => serializer.serialize_none(),
        }
    }
}
