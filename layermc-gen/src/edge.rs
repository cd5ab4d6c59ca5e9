//! Edge detection and distance-to-edge over a height grid.
//!
//! Grids are row-major (`index = row * width + col`) and only cover the
//! queried region; cells outside it are never looked at. Neighbours are the
//! four orthogonal columns and distances are grid (Manhattan) steps.

use std::collections::VecDeque;

use rayon::prelude::*;

const NEIGHBOURS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Mark edge columns: a column is an edge when some neighbour stands at least
/// `threshold` blocks higher, i.e. the column is the foot of a step.
pub fn detect_edges(heights: &[i32], width: usize, threshold: u32) -> Vec<bool> {
    let mut edges = vec![false; heights.len()];
    if width == 0 || heights.is_empty() {
        return edges;
    }
    let depth = heights.len() / width;
    let threshold = threshold as i64;

    edges.par_chunks_mut(width).enumerate().for_each(|(row, out)| {
        for (col, edge) in out.iter_mut().enumerate() {
            let here = heights[row * width + col] as i64;
            *edge = NEIGHBOURS.iter().any(|&(dc, dr)| {
                neighbour(col, row, dc, dr, width, depth)
                    .is_some_and(|n| heights[n] as i64 - here >= threshold)
            });
        }
    });
    edges
}

/// Breadth-first distance from the nearest edge column. Cells at or beyond
/// `cap` (and every cell when there are no edges) are `None`.
pub fn distance_field(edges: &[bool], width: usize, cap: u32) -> Vec<Option<u32>> {
    let mut distances = vec![None; edges.len()];
    if width == 0 || cap == 0 {
        return distances;
    }
    let depth = edges.len() / width;

    let mut queue = VecDeque::new();
    for (i, _) in edges.iter().enumerate().filter(|(_, e)| **e) {
        distances[i] = Some(0);
        queue.push_back(i);
    }

    while let Some(i) = queue.pop_front() {
        let Some(d) = distances[i] else { continue };
        let next = d + 1;
        if next >= cap {
            continue;
        }
        let (col, row) = (i % width, i / width);
        for &(dc, dr) in &NEIGHBOURS {
            if let Some(n) = neighbour(col, row, dc, dr, width, depth) {
                if distances[n].is_none() {
                    distances[n] = Some(next);
                    queue.push_back(n);
                }
            }
        }
    }
    distances
}

fn neighbour(col: usize, row: usize, dc: i64, dr: i64, width: usize, depth: usize) -> Option<usize> {
    let c = col as i64 + dc;
    let r = row as i64 + dr;
    if c < 0 || r < 0 || c >= width as i64 || r >= depth as i64 {
        return None;
    }
    Some(r as usize * width + c as usize)
}
