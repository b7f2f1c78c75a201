// Alert code value object

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertCode {
    WithdrawOver100,
    ThreeConsecutiveWithdraws,
    ThreeConsecutiveIncreasingDeposits,
    AccumulativeDepositOver200,
}

impl AlertCode {
    pub fn code(&self) -> u16 {
        match self {
            AlertCode::WithdrawOver100 => 1100,
            AlertCode::ThreeConsecutiveWithdraws => 30,
            AlertCode::ThreeConsecutiveIncreasingDeposits => 300,
            AlertCode::AccumulativeDepositOver200 => 123,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCode::WithdrawOver100 => "withdraw_over_100",
            AlertCode::ThreeConsecutiveWithdraws => "three_consecutive_withdraws",
            AlertCode::ThreeConsecutiveIncreasingDeposits => "three_consecutive_increasing_deposits",
            AlertCode::AccumulativeDepositOver200 => "accumulative_deposit_over_200",
        }
    }
}

impl Serialize for AlertCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.code())
    }
}
