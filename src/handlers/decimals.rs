use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::codec::decimal_to_number;
use crate::context::ExecutionContext;
use crate::types::Error;

/// Returns figures that upstream systems hold as high-precision decimals,
/// coerced to plain JSON numbers on the way out.
pub async fn handler(_event: Value, _ctx: ExecutionContext) -> Result<Value, Error> {
    let units = Decimal::new(3, 0);
    let price = Decimal::new(1999, 2);

    Ok(json!({
        "units": decimal_to_number(units),
        "price": decimal_to_number(price),
    }))
}
