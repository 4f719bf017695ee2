//! Importance-weighted eviction for an over-full message list

use crate::config::EvictionPolicy;
use crate::types::MessageEntry;
use std::cmp::Ordering;

/// Blend of stored importance and position; later messages rank higher
pub fn blended_scores(messages: &[MessageEntry], policy: &EvictionPolicy) -> Vec<f64> {
    let len = messages.len() as f64;
    messages
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let recency_rank = (i + 1) as f64 / len;
            policy.importance_weight * m.importance + policy.recency_weight * recency_rank
        })
        .collect()
}

/// Trim `messages` back under the cap. Returns how many were dropped.
///
/// The top `keep_ratio * max_messages` by blended score survive, plus the
/// `recent_floor` newest messages regardless of score. Survivors keep their
/// chronological order.
pub fn evict(messages: &mut Vec<MessageEntry>, policy: &EvictionPolicy) -> usize {
    let len = messages.len();
    let cap = policy.max_messages;
    if len <= cap {
        return 0;
    }

    let scores = blended_scores(messages, policy);
    let keep_by_score = (cap as f64 * policy.keep_ratio).floor() as usize;
    // The newest message survives even with a zero floor
    let recent_start = len.saturating_sub(policy.recent_floor.max(1));

    // Highest score first; ties go to the newer message
    let mut ranked: Vec<usize> = (0..len).collect();
    ranked.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
            .then(b.cmp(&a))
    });

    let mut keep = vec![false; len];
    for &i in ranked.iter().take(keep_by_score) {
        keep[i] = true;
    }
    for flag in keep.iter_mut().skip(recent_start) {
        *flag = true;
    }

    let mut kept = keep.iter().filter(|k| **k).count();
    for &i in ranked.iter().rev() {
        if kept <= cap {
            break;
        }
        if keep[i] && i < recent_start {
            keep[i] = false;
            kept -= 1;
        }
    }

    let mut survivors: Vec<MessageEntry> = std::mem::take(messages)
        .into_iter()
        .zip(keep)
        .filter_map(|(m, k)| k.then_some(m))
        .collect();

    // recent_floor larger than the cap: newest win
    if survivors.len() > cap {
        survivors.drain(..survivors.len() - cap);
    }

    *messages = survivors;
    len - messages.len()
}
