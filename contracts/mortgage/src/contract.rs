use std::ops::Deref;

use platform::{
    bank::{self, BankAccountView as _},
    batch::{Batch, Emit, Emitter},
    error as platform_error, response,
};
use sdk::{
    cosmwasm_ext::Response as CwResponse,
    cosmwasm_std::{
        Addr, Binary, Deps, DepsMut, Env, MessageInfo, entry_point, to_json_binary,
    },
};
use versioning::{Package, VersionSegment, package};

use crate::{
    api::{ExecuteMsg, InstantiateMsg, MigrateMsg, PayLoanResponse, QueryMsg},
    error::ContractError,
    loan::Loan,
    result::ContractResult,
    state,
};

const CONTRACT_STORAGE_VERSION: VersionSegment = 0;
const CURRENT_PACKAGE: Package = package!(CONTRACT_STORAGE_VERSION);

#[entry_point]
pub fn instantiate(
    deps: DepsMut<'_>,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> ContractResult<CwResponse> {
    versioning::initialize(deps.storage, CURRENT_PACKAGE)
        .map_err(ContractError::from)
        .and_then(|()| {
            deps.api
                .addr_validate(msg.borrower.as_str())
                .map_err(|err| ContractError::InvalidBorrower(err.to_string()))
        })
        .and_then(|borrower| {
            Loan::open(
                borrower,
                info.sender,
                msg.loan,
                msg.interest_rate,
                msg.duration,
            )
        })
        .and_then(|loan| {
            state::open(deps.storage, &loan).map(|()| {
                response::response_only_messages(
                    Emitter::of_type("mortgage-open")
                        .emit_addr("borrower", loan.borrower())
                        .emit_addr("lender", loan.lender())
                        .emit_coin("loan", loan.principal())
                        .emit_to_string_value("interest-rate", loan.interest_rate())
                        .emit_to_string_value("duration", loan.duration())
                        .emit_tx_info(&env),
                )
            })
        })
        .inspect_err(platform_error::log(deps.api))
}

#[entry_point]
pub fn migrate(
    deps: DepsMut<'_>,
    _env: Env,
    MigrateMsg {}: MigrateMsg,
) -> ContractResult<CwResponse> {
    versioning::update_software(deps.storage, CURRENT_PACKAGE)
        .map(|_prev| response::empty_response())
        .map_err(Into::into)
        .inspect_err(platform_error::log(deps.api))
}

#[entry_point]
pub fn execute(
    mut deps: DepsMut<'_>,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> ContractResult<CwResponse> {
    match msg {
        ExecuteMsg::PayLoan {} => try_pay_loan(deps.branch(), &env, info),
    }
    .inspect_err(platform_error::log(deps.api))
}

#[entry_point]
pub fn query(deps: Deps<'_>, _env: Env, msg: QueryMsg) -> ContractResult<Binary> {
    match msg {
        QueryMsg::Borrower {} => state::borrower(deps.storage)
            .granted_to()
            .map_err(Into::into)
            .and_then(|borrower| to_json_binary(&borrower).map_err(Into::into)),
        QueryMsg::Lender {} => state::lender(deps.storage)
            .owner()
            .map_err(Into::into)
            .and_then(|lender| to_json_binary(&lender).map_err(Into::into)),
        QueryMsg::LoanAmount {} => state::load_principal(deps.storage)
            .and_then(|principal| to_json_binary(&principal).map_err(Into::into)),
        QueryMsg::LoanPaid {} => {
            state::paid(deps.storage).and_then(|paid| to_json_binary(&paid).map_err(Into::into))
        }
        QueryMsg::InterestRate {} => state::load(deps.storage)
            .and_then(|loan| to_json_binary(&loan.interest_rate()).map_err(Into::into)),
        QueryMsg::Duration {} => state::load(deps.storage)
            .and_then(|loan| to_json_binary(&loan.duration()).map_err(Into::into)),
        QueryMsg::Balance { address } => query_balance(deps, &address),
        QueryMsg::Terms {} => state::load(deps.storage)
            .and_then(|loan| to_json_binary(&loan.into_terms()).map_err(Into::into)),
        QueryMsg::ContractVersion {} => versioning::load(deps.storage)
            .map_err(Into::into)
            .and_then(|package| to_json_binary(&package).map_err(Into::into)),
    }
    .inspect_err(platform_error::log(deps.api))
}

fn try_pay_loan(deps: DepsMut<'_>, env: &Env, info: MessageInfo) -> ContractResult<CwResponse> {
    state::borrower(deps.storage.deref()).check(&info.sender)?;

    let mut loan = state::load(deps.storage)?;
    let mut account = bank::account(&env.contract.address, deps.querier);
    loan.pay(&info.funds, &mut account)?;
    state::settle(deps.storage, &loan)?;

    let emitter = Emitter::with_batch(Batch::from(account), "mortgage-pay-loan")
        .emit_addr("borrower", loan.borrower())
        .emit_addr("lender", loan.lender())
        .emit_coin("payment", loan.principal())
        .emit_tx_info(env);

    response::response_with_messages(&PayLoanResponse { paid: loan.paid() }, emitter)
        .map_err(Into::into)
}

fn query_balance(deps: Deps<'_>, address: &Addr) -> ContractResult<Binary> {
    let denom = state::load_principal(deps.storage)?.denom;

    deps.api.addr_validate(address.as_str())?;
    bank::account_view(address, deps.querier)
        .balance(&denom)
        .map_err(Into::into)
        .and_then(|balance| to_json_binary(&balance).map_err(Into::into))
}
