use sdk::{
    cosmwasm_ext::Response as CwResponse,
    cosmwasm_std::{Addr, BankMsg, Coin as CwCoin, CosmosMsg, SubMsg},
};

pub use crate::emit::{Emit, Emitter};

#[derive(Default, Debug, PartialEq)]
#[must_use]
pub struct Batch {
    msgs: Vec<SubMsg>,
}

impl Batch {
    fn schedule_execute_no_reply<M>(&mut self, msg: M)
    where
        M: Into<CosmosMsg>,
    {
        self.msgs.push(SubMsg::new(msg));
    }

    pub fn schedule_transfer(&mut self, amount: CwCoin, to: &Addr) {
        self.schedule_execute_no_reply(BankMsg::Send {
            to_address: to.into(),
            amount: vec![amount],
        });
    }

    pub fn len(&self) -> usize {
        self.msgs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.msgs.is_empty()
    }
}

impl From<Batch> for CwResponse {
    fn from(batch: Batch) -> Self {
        Self::default().add_submessages(batch.msgs)
    }
}
