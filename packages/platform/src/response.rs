use serde::Serialize;

use sdk::{
    cosmwasm_ext::Response as CwResponse,
    cosmwasm_std::{self, Binary},
};

use crate::result::Result;

pub fn empty_response() -> CwResponse {
    CwResponse::default()
}

pub fn response_only_messages<M>(messages: M) -> CwResponse
where
    M: Into<CwResponse>,
{
    messages.into()
}

pub fn response_with_messages<T, M>(response: &T, messages: M) -> Result<CwResponse>
where
    T: Serialize + ?Sized,
    M: Into<CwResponse>,
{
    let messages: CwResponse = messages.into();

    debug_assert_eq!(messages.data, None, "Overwriting previous response!");

    cosmwasm_std::to_json_binary(response)
        .map_err(Into::into)
        .map(|data: Binary| messages.set_data(data))
}
