/// Kaplan-Meier survival curve for survival analysis.
///
/// The Kaplan-Meier estimator is a non-parametric statistic used to estimate the survival
/// function from lifetime data. It accounts for censored data (observations where the event
/// of interest has not occurred by the end of the study period).
///
/// # Fields
///
/// The curve stores parallel vectors representing the survival function at discrete time points:
/// - Time points where events occurred
/// - Survival probability at each time point
/// - Number of subjects at risk at each time point
/// - Number of events (non-censored observations) at each time point
#[derive(Debug, Clone)]
pub struct KaplanMeierCurve {
    /// Time points where events (non-censored observations) occurred.
    pub times: Vec<f64>,
    /// Survival probability at each corresponding time point.
    /// Values range from 0.0 (no survival) to 1.0 (complete survival).
    pub survival_prob: Vec<f64>,
    /// Number of subjects at risk (not yet experienced the event or censored) at each time point.
    pub at_risk: Vec<usize>,
    /// Number of events (non-censored observations) that occurred at each time point.
    pub events: Vec<usize>,
}

impl KaplanMeierCurve {
    /// Computes the Kaplan-Meier survival curve from survival data.
    ///
    /// # Arguments
    ///
    /// * `data` - A vector of tuples where each tuple contains:
    ///   - `time`: The time at which the observation occurred
    ///   - `is_censored`: `true` if the observation was censored (event did not occur),
    ///     `false` if the event occurred
    ///
    /// # Returns
    ///
    /// A `KaplanMeierCurve` with survival probabilities calculated at each event time.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fuzzstat_stats::survival::KaplanMeierCurve;
    /// // Data: (time, is_censored)
    /// let data = vec![
    ///     (10.0, false), // Event at time 10
    ///     (20.0, true),  // Censored at time 20
    ///     (30.0, false), // Event at time 30
    /// ];
    /// let curve = KaplanMeierCurve::from_data(data);
    /// assert_eq!(curve.times, vec![10.0, 30.0]);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_data(mut data: Vec<(f64, bool)>) -> Self {
        if data.is_empty() {
            return Self {
                times: vec![],
                survival_prob: vec![],
                at_risk: vec![],
                events: vec![],
            };
        }

        // Sort by time
        data.sort_by(|(a, _), (b, _)| a.total_cmp(b));

        let mut times = vec![];
        let mut survival_prob = vec![];
        let mut at_risk_vec = vec![];
        let mut events_vec = vec![];

        let mut current_survival = 1.0;
        let total = data.len();

        let mut i = 0;
        while i < data.len() {
            let current_time = data[i].0;
            let at_risk = total - i;

            // Count events (non-censored) at this time point
            let mut event_count = 0;
            let mut j = i;
            while j < data.len() && data[j].0.total_cmp(&current_time).is_eq() {
                if !data[j].1 {
                    event_count += 1;
                }
                j += 1;
            }

            if event_count > 0 {
                let survival_rate = 1.0 - (event_count as f64 / at_risk as f64);
                current_survival *= survival_rate;

                times.push(current_time);
                survival_prob.push(current_survival);
                at_risk_vec.push(at_risk);
                events_vec.push(event_count);
            }

            i = j;
        }

        Self {
            times,
            survival_prob,
            at_risk: at_risk_vec,
            events: events_vec,
        }
    }

    /// Returns the median survival time.
    ///
    /// The median survival time is the time at which the survival probability
    /// drops to or below 50%. If the survival probability never reaches 50%,
    /// this method returns `None`.
    ///
    /// Linear interpolation is used between time points for more accurate estimates.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fuzzstat_stats::survival::KaplanMeierCurve;
    /// let data = vec![(10.0, false), (20.0, false), (30.0, false)];
    /// let curve = KaplanMeierCurve::from_data(data);
    /// if let Some(median) = curve.median_survival() {
    ///     println!("Median survival time: {}", median);
    /// }
    /// ```
    #[must_use]
    pub fn median_survival(&self) -> Option<f64> {
        let i = self.survival_prob.iter().position(|&p| p <= 0.5)?;
        if i == 0 {
            return Some(self.times[0]);
        }
        let t0 = self.times[i - 1];
        let t1 = self.times[i];
        let s0 = self.survival_prob[i - 1];
        let s1 = self.survival_prob[i];
        Some(t0 + (0.5 - s0) / (s1 - s0) * (t1 - t0))
    }

    /// Returns the survival probability at a specific time.
    ///
    /// This method uses a step function: the survival probability remains constant
    /// between event times and decreases only when an event occurs.
    ///
    /// Returns `1.0` if the time is before the first event, or the last known
    /// survival probability if the time is after the last event.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fuzzstat_stats::survival::KaplanMeierCurve;
    /// let data = vec![(10.0, false), (20.0, false)];
    /// let curve = KaplanMeierCurve::from_data(data);
    ///
    /// assert_eq!(curve.survival_at(5.0), 1.0);  // Before first event
    /// assert!(curve.survival_at(15.0) < 1.0);   // After first event
    /// ```
    #[must_use]
    pub fn survival_at(&self, time: f64) -> f64 {
        let idx = self.times.partition_point(|&t| t <= time);
        if idx == 0 {
            1.0
        } else {
            self.survival_prob[idx - 1]
        }
    }

    /// Returns the restricted mean survival time up to `horizon`.
    ///
    /// This is the area under the survival step function between time `0` and
    /// `horizon`. Observation times are expected to be non-negative.
    ///
    /// With an infinite horizon the area is finite only if the curve reaches
    /// zero, i.e. the longest observation is an event. Otherwise `f64::INFINITY`
    /// is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fuzzstat_stats::survival::KaplanMeierCurve;
    /// // Without censoring the restricted mean is the sample mean.
    /// let curve = KaplanMeierCurve::from_data(vec![(1.0, false), (2.0, false), (6.0, false)]);
    /// assert!((curve.restricted_mean(f64::INFINITY) - 3.0).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn restricted_mean(&self, horizon: f64) -> f64 {
        let mut area = 0.0;
        let mut prev_time = 0.0;
        let mut prev_survival = 1.0;

        for (&time, &survival) in self.times.iter().zip(&self.survival_prob) {
            if time >= horizon {
                break;
            }
            area += prev_survival * (time - prev_time);
            prev_time = time;
            prev_survival = survival;
        }

        if prev_survival > 0.0 {
            if horizon.is_infinite() {
                return f64::INFINITY;
            }
            area += prev_survival * (horizon - prev_time);
        }
        area
    }
}
