//! Bootstrapped targets and target estimator synchronization.
use crate::{error::InvPendError, Action, NormalizedState, QValueEstimator, Transition};
use anyhow::Result;

/// Computes the Q-learning target of every transition in `batch`.
///
/// The target is `r + gamma * max_a Q_tgt(s', a)` when `s'` is inside the
/// operating envelope, and `r` alone otherwise. The target estimator is
/// queried once for all `3 * batch.len()` pairs.
pub fn bootstrap_targets<Q>(batch: &[Transition], qnet_tgt: &Q, gamma: f64) -> Result<Vec<f32>>
where
    Q: QValueEstimator,
{
    if batch.is_empty() {
        return Ok(vec![]);
    }

    let (states, actions): (Vec<NormalizedState>, Vec<Action>) = batch
        .iter()
        .flat_map(|tr| (0..Action::N).map(move |i| (tr.next_state, Action::ALL[i])))
        .unzip();
    let q = qnet_tgt.predict(&states, &actions)?;
    if q.len() != states.len() {
        anyhow::bail!(
            "Target estimator returned {} values for {} queries",
            q.len(),
            states.len()
        );
    }

    let gamma = gamma as f32;
    Ok(batch
        .iter()
        .zip(q.chunks(Action::N))
        .map(|(tr, q)| {
            if tr.is_next_valid() {
                let q_max = q[0].max(q[1]).max(q[2]);
                tr.reward + gamma * q_max
            } else {
                tr.reward
            }
        })
        .collect())
}

/// Returns the loss, or [`InvPendError::Divergence`] if it is NaN.
pub fn check_loss(loss: f32, episode: usize, step: usize) -> Result<f32> {
    if loss.is_nan() {
        Err(InvPendError::Divergence { episode, step }.into())
    } else {
        Ok(loss)
    }
}

/// Moves the target estimator towards the online one with rate `tau`.
pub fn sync_target<Q>(qnet_tgt: &mut Q, qnet: &Q, tau: f64) -> Result<()>
where
    Q: QValueEstimator,
{
    qnet_tgt.soft_update(qnet, tau)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::TableEstimator;

    fn tr(reward: f32, next: [f64; 4]) -> Transition {
        Transition::new(
            NormalizedState::new([0.0; 4]),
            Action::Hold,
            reward,
            NormalizedState::new(next),
        )
    }

    #[test]
    fn test_bootstrap_valid_next_state() -> Result<()> {
        let qnet_tgt = TableEstimator::new([0.5, 2.0, -1.0]);
        let batch = vec![tr(0.1, [0.0; 4]), tr(-0.001, [1.0, -1.0, 0.5, 0.0])];
        let tgt = bootstrap_targets(&batch, &qnet_tgt, 0.9)?;
        assert!((tgt[0] - (0.1 + 0.9 * 2.0)).abs() < 1e-6);
        assert!((tgt[1] - (-0.001 + 0.9 * 2.0)).abs() < 1e-6);
        assert_eq!(qnet_tgt.n_predicts(), 1);
        Ok(())
    }

    #[test]
    fn test_terminal_masking() -> Result<()> {
        let batch = vec![
            tr(-1.0, [1.5, 0.0, 0.0, 0.0]),
            tr(-1.0, [0.0, 0.0, -1.0000001, 0.0]),
            tr(0.25, [0.0, 3.0, 0.0, 0.0]),
        ];
        for &gamma in [0.0, 0.5, 0.9, 1.0].iter() {
            for q in [[100.0, -5.0, 3.0], [-7.0, -7.0, -7.0]].iter() {
                let qnet_tgt = TableEstimator::new(*q);
                let tgt = bootstrap_targets(&batch, &qnet_tgt, gamma)?;
                assert_eq!(tgt, vec![-1.0, -1.0, 0.25]);
            }
        }
        Ok(())
    }

    #[test]
    fn test_empty_batch() -> Result<()> {
        let qnet_tgt = TableEstimator::new([0.0; 3]);
        assert!(bootstrap_targets(&[], &qnet_tgt, 0.9)?.is_empty());
        assert_eq!(qnet_tgt.n_predicts(), 0);
        Ok(())
    }

    #[test]
    fn test_check_loss() {
        assert_eq!(check_loss(0.5, 0, 0).unwrap(), 0.5);
        let err = check_loss(f32::NAN, 3, 7).unwrap_err();
        match err.downcast_ref::<InvPendError>() {
            Some(InvPendError::Divergence { episode, step }) => {
                assert_eq!((*episode, *step), (3, 7));
            }
            _ => panic!("unexpected error: {}", err),
        }
    }

    #[test]
    fn test_sync_target() -> Result<()> {
        let qnet = TableEstimator::new([1.0, 2.0, 3.0]);
        let mut qnet_tgt = TableEstimator::new([0.0, 0.0, 0.0]);
        sync_target(&mut qnet_tgt, &qnet, 0.1)?;
        let q = qnet_tgt.table();
        assert!((q[0] - 0.1).abs() < 1e-6);
        assert!((q[1] - 0.2).abs() < 1e-6);
        assert!((q[2] - 0.3).abs() < 1e-6);
        Ok(())
    }
}
