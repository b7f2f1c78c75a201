use std::sync::atomic::{AtomicU64, Ordering};

use fundwatch_domain::AlertCode;

#[derive(Debug, Default)]
pub struct Metrics {
    ingest_requests: AtomicU64,
    ingest_events: AtomicU64,
    ingest_rejected: AtomicU64,
    ingest_errors: AtomicU64,
    evaluation_errors: AtomicU64,
    alerts_withdraw_over_100: AtomicU64,
    alerts_three_consecutive_withdraws: AtomicU64,
    alerts_increasing_deposits: AtomicU64,
    alerts_deposit_window: AtomicU64,
}

impl Metrics {
    pub fn record_request(&self) {
        self.ingest_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stored(&self) {
        self.ingest_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.ingest_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ingest_error(&self) {
        self.ingest_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_evaluation_error(&self) {
        self.evaluation_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_alerts(&self, codes: &[AlertCode]) {
        for code in codes {
            self.alert_counter(*code).fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn stored_events(&self) -> u64 {
        self.ingest_events.load(Ordering::Relaxed)
    }

    fn alert_counter(&self, code: AlertCode) -> &AtomicU64 {
        match code {
            AlertCode::WithdrawOver100 => &self.alerts_withdraw_over_100,
            AlertCode::ThreeConsecutiveWithdraws => &self.alerts_three_consecutive_withdraws,
            AlertCode::ThreeConsecutiveIncreasingDeposits => &self.alerts_increasing_deposits,
            AlertCode::AccumulativeDepositOver200 => &self.alerts_deposit_window,
        }
    }

    pub fn render_prometheus(&self) -> String {
        let requests = self.ingest_requests.load(Ordering::Relaxed);
        let events = self.ingest_events.load(Ordering::Relaxed);
        let rejected = self.ingest_rejected.load(Ordering::Relaxed);
        let errors = self.ingest_errors.load(Ordering::Relaxed);
        let evaluation_errors = self.evaluation_errors.load(Ordering::Relaxed);

        let mut out = format!(
            "# TYPE fundwatch_ingest_requests_total counter\n\
fundwatch_ingest_requests_total {}\n\
# TYPE fundwatch_ingest_events_total counter\n\
fundwatch_ingest_events_total {}\n\
# TYPE fundwatch_ingest_rejected_total counter\n\
fundwatch_ingest_rejected_total {}\n\
# TYPE fundwatch_ingest_errors_total counter\n\
fundwatch_ingest_errors_total {}\n\
# TYPE fundwatch_evaluation_errors_total counter\n\
fundwatch_evaluation_errors_total {}\n\
# TYPE fundwatch_alerts_total counter\n",
            requests, events, rejected, errors, evaluation_errors
        );
        for code in [
            AlertCode::WithdrawOver100,
            AlertCode::ThreeConsecutiveWithdraws,
            AlertCode::ThreeConsecutiveIncreasingDeposits,
            AlertCode::AccumulativeDepositOver200,
        ] {
            out.push_str(&format!(
                "fundwatch_alerts_total{{code=\"{}\"}} {}\n",
                code.code(),
                self.alert_counter(code).load(Ordering::Relaxed)
            ));
        }
        out
    }
}
