use mortgage::api::{QueryMsg, TermsResponse};
use sdk::{
    cosmwasm_std::{Addr, Coin, coin, from_json},
    testing,
};
use versioning::Package;

use crate::common::{DENOM, GENESIS, PRINCIPAL, TestCase, principal};

#[test]
fn borrower_repays_lender() {
    let mut test_case = TestCase::new();
    assert!(!test_case.paid());

    let borrower = test_case.borrower.clone();
    let response = test_case.pay(&borrower, &[principal()]).unwrap();

    assert!(test_case.paid());
    assert_eq!(test_case.balance(&test_case.borrower), GENESIS - PRINCIPAL);
    assert_eq!(test_case.balance(&test_case.lender), GENESIS + PRINCIPAL);
    assert_eq!(test_case.balance(&test_case.contract), 0);

    let paid: mortgage::api::PayLoanResponse =
        from_json(response.data.as_ref().unwrap()).unwrap();
    assert!(paid.paid);

    let event = testing::events_of_type(&response, "wasm-mortgage-pay-loan")
        .next()
        .unwrap();
    assert!(event.attributes.iter().any(|attribute| {
        attribute.key == "payment-amount" && attribute.value == PRINCIPAL.to_string()
    }));
    assert!(
        event
            .attributes
            .iter()
            .any(|attribute| attribute.key == "borrower" && attribute.value == borrower.as_str())
    );
}

#[test]
fn second_payment_reverts() {
    let mut test_case = TestCase::new();
    let borrower = test_case.borrower.clone();

    test_case.pay(&borrower, &[principal()]).unwrap();
    let err = test_case.pay(&borrower, &[principal()]).unwrap_err();

    assert!(testing::revert_reason(&err).contains("already paid"));
    assert!(test_case.paid());
    assert_eq!(test_case.balance(&test_case.borrower), GENESIS - PRINCIPAL);
    assert_eq!(test_case.balance(&test_case.lender), GENESIS + PRINCIPAL);
}

#[test]
fn only_borrower_pays() {
    let mut test_case = TestCase::new();

    [test_case.lender.clone(), testing::user("stranger")]
        .iter()
        .for_each(|sender| {
            let err = test_case.pay(sender, &[principal()]).unwrap_err();

            assert!(testing::revert_reason(&err).contains("Unauthorized"));
            assert_eq!(test_case.balance(sender), GENESIS);
        });

    assert!(!test_case.paid());
    assert_eq!(test_case.balance(&test_case.borrower), GENESIS);
    assert_eq!(test_case.balance(&test_case.contract), 0);
}

#[test]
fn stranger_after_payment_is_unauthorized() {
    let mut test_case = TestCase::new();
    let borrower = test_case.borrower.clone();
    test_case.pay(&borrower, &[principal()]).unwrap();

    let err = test_case
        .pay(&testing::user("stranger"), &[principal()])
        .unwrap_err();

    assert!(testing::revert_reason(&err).contains("Unauthorized"));
}

#[test]
fn wrong_amount_reverts() {
    let mut test_case = TestCase::new();
    let borrower = test_case.borrower.clone();

    [
        vec![coin(PRINCIPAL - 1, DENOM)],
        vec![coin(PRINCIPAL + 1, DENOM)],
    ]
    .iter()
    .for_each(|funds| {
        let err = test_case.pay(&borrower, funds).unwrap_err();

        assert!(testing::revert_reason(&err).contains("amount mismatch"));
    });

    assert!(!test_case.paid());
    assert_eq!(test_case.balance(&test_case.borrower), GENESIS);
    assert_eq!(test_case.balance(&test_case.lender), GENESIS);
}

#[test]
fn wrong_funds_revert() {
    let mut test_case = TestCase::new();
    let borrower = test_case.borrower.clone();
    testing::init_balance(&mut test_case.app, &borrower, vec![
        coin(GENESIS, DENOM),
        coin(PRINCIPAL, "uother"),
    ])
    .unwrap();

    let no_funds = test_case.pay(&borrower, &[]).unwrap_err();
    assert!(testing::revert_reason(&no_funds).contains("found none"));

    let other_denom = test_case
        .pay(&borrower, &[coin(PRINCIPAL, "uother")])
        .unwrap_err();
    assert!(testing::revert_reason(&other_denom).contains("uother"));

    let extra = test_case
        .pay(&borrower, &[coin(PRINCIPAL, "uother"), principal()])
        .unwrap_err();
    assert!(testing::revert_reason(&extra).contains("extra"));

    assert!(!test_case.paid());
    assert_eq!(test_case.balance(&test_case.borrower), GENESIS);
}

#[test]
fn reads() {
    let test_case = TestCase::new();

    assert_eq!(
        test_case.query::<Addr>(&QueryMsg::Borrower {}),
        test_case.borrower
    );
    assert_eq!(test_case.query::<Addr>(&QueryMsg::Lender {}), test_case.lender);
    assert_eq!(test_case.query::<Coin>(&QueryMsg::LoanAmount {}), principal());
    assert_eq!(test_case.query::<u32>(&QueryMsg::InterestRate {}), 5);
    assert_eq!(test_case.query::<u32>(&QueryMsg::Duration {}), 360);
    assert_eq!(
        test_case.query::<Coin>(&QueryMsg::Balance {
            address: test_case.lender.clone(),
        }),
        coin(GENESIS, DENOM)
    );
    assert_eq!(
        test_case.query::<Coin>(&QueryMsg::Balance {
            address: testing::user("nobody"),
        }),
        coin(0, DENOM)
    );

    let terms: TermsResponse = test_case.query(&QueryMsg::Terms {});
    assert_eq!(terms.borrower, test_case.borrower);
    assert_eq!(terms.lender, test_case.lender);
    assert_eq!(terms.loan, principal());
    assert!(!terms.paid);
}

#[test]
fn migrate_keeps_state() {
    let mut test_case = TestCase::new();
    let borrower = test_case.borrower.clone();
    test_case.pay(&borrower, &[principal()]).unwrap();

    test_case.migrate().unwrap();

    assert!(test_case.paid());
    let release: Package = test_case.query(&QueryMsg::ContractVersion {});
    assert_eq!(release.name(), "mortgage");
}
