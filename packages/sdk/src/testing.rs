use anyhow::Result as AnyResult;
use cosmwasm_std::{Addr, Coin, Empty, testing::MockApi};
use cw_multi_test::{AppResponse, BasicApp};
pub use cw_multi_test::{ContractWrapper, Executor, next_block};

pub type App = BasicApp;

pub type Contract = dyn cw_multi_test::Contract<Empty>;

pub type CodeId = u64;

/// Make a valid address of a test user
///
/// The address is deterministic and shared between [`App`] and the mocks
/// in [`cosmwasm_std::testing`] since both use the default [`MockApi`].
pub fn user(name: &str) -> Addr {
    MockApi::default().addr_make(name)
}

pub fn new_app() -> App {
    App::default()
}

pub fn store_code(app: &mut App, contract: Box<Contract>) -> CodeId {
    app.store_code(contract)
}

pub fn init_balance(app: &mut App, account: &Addr, coins: Vec<Coin>) -> AnyResult<()> {
    app.init_modules(|router, _api, storage| router.bank.init_balance(storage, account, coins))
}

pub fn query_balance(app: &App, account: &Addr, denom: &str) -> AnyResult<Coin> {
    app.wrap()
        .query_balance(account, denom)
        .map_err(Into::into)
}

/// Move the chain `count` blocks ahead
pub fn advance_blocks(app: &mut App, count: u32) {
    (0..count).for_each(|_| app.update_block(next_block));
}

/// The innermost cause of a failed transaction
///
/// `cw-multi-test` wraps a contract error in several layers of context.
pub fn revert_reason(error: &anyhow::Error) -> String {
    error.root_cause().to_string()
}

pub fn events_of_type<'r>(
    response: &'r AppResponse,
    event_type: &'r str,
) -> impl Iterator<Item = &'r cosmwasm_std::Event> + 'r {
    response
        .events
        .iter()
        .filter(move |event| event.ty == event_type)
}
