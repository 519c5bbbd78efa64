//! Attach decoded series maps onto previously parsed base records
//!
//! This is a pure keyed join: an entity whose name is present in the map
//! gets its series field *replaced* with the map's list (last/only writer
//! wins, no merging of multiple sources into one field); entities absent
//! from the map keep their existing, typically empty, list. An empty map
//! makes the whole step a no-op.

use crate::model::{NewMarket, NewNode, NewProcess, ValueInput};
use crate::parse::series::SeriesMap;

fn attach<T>(
    items: &mut [T],
    map: &SeriesMap,
    name: impl Fn(&T) -> &str,
    field: impl Fn(&mut T) -> &mut Vec<ValueInput>,
) {
    for item in items.iter_mut() {
        if let Some(series) = map.get(name(item)) {
            *field(item) = series.clone();
        }
    }
}

/// Fill `node.cost` from the node price sheet.
pub fn attach_node_costs(nodes: &mut [NewNode], costs: &SeriesMap) {
    attach(nodes, costs, |n| &n.name, |n| &mut n.cost);
}

/// Fill `node.inflow` from the inflow sheet.
pub fn attach_node_inflow(nodes: &mut [NewNode], inflow: &SeriesMap) {
    attach(nodes, inflow, |n| &n.name, |n| &mut n.inflow);
}

/// Fill `process.cf` from the capacity-factor sheet.
pub fn attach_process_cf(processes: &mut [NewProcess], cf: &SeriesMap) {
    attach(processes, cf, |p| &p.name, |p| &mut p.cf);
}

/// Fill `market.price` from the market prices sheet. The other three price
/// slots have no source sheet and stay empty.
pub fn attach_market_prices(markets: &mut [NewMarket], prices: &SeriesMap) {
    attach(markets, prices, |m| &m.name, |m| &mut m.price);
}
