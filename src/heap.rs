//! An 8-ary dual heap (max-heap of the lower half, min-heap of the upper
//! half) over values stored in a shared node arena, addressed by arena
//! index rather than pointer.
//!
//! Each heap is a `Vec<usize>` of arena indices. Every swap inside a sift
//! routine keeps the corresponding node's `heap_position` in sync with its
//! slot in the array, so a node can be located and repositioned in O(1)
//! without a search — this is the mechanism the large-window engine relies
//! on to evict the oldest window sample in place.
const ARITY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapKind {
  Max,
  Min,
  NanSide,
}

/// A single slot in the node arena backing the large-window engine.
#[derive(Debug, Clone)]
pub struct HeapNode {
  pub value: f64,
  pub heap_position: usize,
  pub heap_kind: HeapKind,
  pub next: usize,
  pub is_nan: bool,
}

impl HeapNode {
  pub fn new(value: f64) -> Self {
    HeapNode {
      value,
      heap_position: 0,
      heap_kind: HeapKind::NanSide,
      next: 0,
      is_nan: value.is_nan(),
    }
  }
}

#[inline]
fn parent_of(position: usize) -> usize {
  (position - 1) / ARITY
}

#[inline]
fn first_child_of(position: usize) -> usize {
  position * ARITY + 1
}

/// Number of children (0..=8) that `position` has in a heap of length
/// `heap_len`.
#[inline]
fn child_count(heap_len: usize, position: usize) -> usize {
  let min_child = first_child_of(position);
  if min_child >= heap_len {
    0
  } else {
    let max_child = min_child + ARITY - 1;
    if max_child >= heap_len {
      heap_len - min_child
    } else {
      ARITY
    }
  }
}

/// Max-heap of the window's lower half and min-heap of its upper half,
/// sharing the caller's node arena.
#[derive(Debug, Default)]
pub struct DualHeap {
  pub max_heap: Vec<usize>,
  pub min_heap: Vec<usize>,
}

impl DualHeap {
  pub fn with_capacity(window: usize) -> Self {
    let half = window / 2 + 1;
    DualHeap {
      max_heap: Vec::with_capacity(half),
      min_heap: Vec::with_capacity(half),
    }
  }

  #[inline]
  pub fn max_len(&self) -> usize {
    self.max_heap.len()
  }

  #[inline]
  pub fn min_len(&self) -> usize {
    self.min_heap.len()
  }

  /// Appends `arena_index` to the max-heap and restores heap order by
  /// sifting it up. Returns the position it settled at.
  pub fn max_push(&mut self, arena: &mut [HeapNode], arena_index: usize) -> usize {
    let position = self.max_heap.len();
    self.max_heap.push(arena_index);
    arena[arena_index].heap_position = position;
    arena[arena_index].heap_kind = HeapKind::Max;
    self.max_sift_up(arena, position);
    arena[arena_index].heap_position
  }

  /// Appends `arena_index` to the min-heap and restores heap order by
  /// sifting it up. Returns the position it settled at.
  pub fn min_push(&mut self, arena: &mut [HeapNode], arena_index: usize) -> usize {
    let position = self.min_heap.len();
    self.min_heap.push(arena_index);
    arena[arena_index].heap_position = position;
    arena[arena_index].heap_kind = HeapKind::Min;
    self.min_sift_up(arena, position);
    arena[arena_index].heap_position
  }

  pub fn max_sift_up(&mut self, arena: &mut [HeapNode], mut position: usize) {
    while position > 0 {
      let parent = parent_of(position);
      if arena[self.max_heap[position]].value <= arena[self.max_heap[parent]].value {
        break;
      }
      self.max_heap.swap(position, parent);
      arena[self.max_heap[position]].heap_position = position;
      arena[self.max_heap[parent]].heap_position = parent;
      position = parent;
    }
  }

  pub fn min_sift_up(&mut self, arena: &mut [HeapNode], mut position: usize) {
    while position > 0 {
      let parent = parent_of(position);
      if arena[self.min_heap[position]].value >= arena[self.min_heap[parent]].value {
        break;
      }
      self.min_heap.swap(position, parent);
      arena[self.min_heap[position]].heap_position = position;
      arena[self.min_heap[parent]].heap_position = parent;
      position = parent;
    }
  }

  fn max_largest_child(&self, arena: &[HeapNode], position: usize) -> usize {
    let min_child = first_child_of(position);
    let count = child_count(self.max_heap.len(), position);
    let mut best = position;
    for i in 0..count {
      let child = min_child + i;
      if arena[self.max_heap[child]].value > arena[self.max_heap[best]].value {
        best = child;
      }
    }
    best
  }

  fn min_smallest_child(&self, arena: &[HeapNode], position: usize) -> usize {
    let min_child = first_child_of(position);
    let count = child_count(self.min_heap.len(), position);
    let mut best = position;
    for i in 0..count {
      let child = min_child + i;
      if arena[self.min_heap[child]].value < arena[self.min_heap[best]].value {
        best = child;
      }
    }
    best
  }

  pub fn max_sift_down(&mut self, arena: &mut [HeapNode], mut position: usize) {
    loop {
      let target = self.max_largest_child(arena, position);
      if target == position {
        break;
      }
      self.max_heap.swap(position, target);
      arena[self.max_heap[position]].heap_position = position;
      arena[self.max_heap[target]].heap_position = target;
      position = target;
    }
  }

  pub fn min_sift_down(&mut self, arena: &mut [HeapNode], mut position: usize) {
    loop {
      let target = self.min_smallest_child(arena, position);
      if target == position {
        break;
      }
      self.min_heap.swap(position, target);
      arena[self.min_heap[position]].heap_position = position;
      arena[self.min_heap[target]].heap_position = target;
      position = target;
    }
  }

  /// Removes and returns the arena index at the max-heap root, shrinking the
  /// heap by one and restoring order among the rest.
  pub fn max_pop_root(&mut self, arena: &mut [HeapNode]) -> usize {
    let root = self.max_heap[0];
    let last = self.max_heap.pop().unwrap();
    if !self.max_heap.is_empty() {
      self.max_heap[0] = last;
      arena[last].heap_position = 0;
      self.max_sift_down(arena, 0);
    }
    root
  }

  /// Removes and returns the arena index at the min-heap root, shrinking the
  /// heap by one and restoring order among the rest.
  pub fn min_pop_root(&mut self, arena: &mut [HeapNode]) -> usize {
    let root = self.min_heap[0];
    let last = self.min_heap.pop().unwrap();
    if !self.min_heap.is_empty() {
      self.min_heap[0] = last;
      arena[last].heap_position = 0;
      self.min_sift_down(arena, 0);
    }
    root
  }

  /// Removes `arena_index` from the max-heap at its current `heap_position`
  /// by swapping it with the last element and sifting the replacement,
  /// mirroring the eviction path used when a finite sample turns into NaN.
  pub fn max_remove(&mut self, arena: &mut [HeapNode], arena_index: usize) {
    let position = arena[arena_index].heap_position;
    let last = self.max_heap.pop().unwrap();
    if last != arena_index {
      self.max_heap[position] = last;
      arena[last].heap_position = position;
      // The replacement may need to move in either direction.
      self.max_sift_down(arena, position);
      self.max_sift_up(arena, arena[last].heap_position);
    }
  }

  /// Removes `arena_index` from the min-heap, symmetric to [`Self::max_remove`].
  pub fn min_remove(&mut self, arena: &mut [HeapNode], arena_index: usize) {
    let position = arena[arena_index].heap_position;
    let last = self.min_heap.pop().unwrap();
    if last != arena_index {
      self.min_heap[position] = last;
      arena[last].heap_position = position;
      self.min_sift_down(arena, position);
      self.min_sift_up(arena, arena[last].heap_position);
    }
  }

  /// If the max-heap root exceeds the min-heap root, swaps the two roots
  /// (flipping their `heap_kind`) and restores order in both heaps. The
  /// only operation that touches both heaps at once.
  pub fn swap_roots_and_rebalance(&mut self, arena: &mut [HeapNode]) {
    if self.max_heap.is_empty() || self.min_heap.is_empty() {
      return;
    }

    let max_root = self.max_heap[0];
    let min_root = self.min_heap[0];
    if arena[max_root].value <= arena[min_root].value {
      return;
    }

    self.max_heap[0] = min_root;
    self.min_heap[0] = max_root;
    arena[min_root].heap_kind = HeapKind::Max;
    arena[min_root].heap_position = 0;
    arena[max_root].heap_kind = HeapKind::Min;
    arena[max_root].heap_position = 0;
    self.max_sift_down(arena, 0);
    self.min_sift_down(arena, 0);
  }

  /// Moves the max-heap root across into the min-heap, used when
  /// `max_len() > min_len() + 1`.
  pub fn transfer_max_root_to_min(&mut self, arena: &mut [HeapNode]) {
    let root = self.max_pop_root(arena);
    self.min_push(arena, root);
    self.swap_roots_and_rebalance(arena);
  }

  /// Moves the min-heap root across into the max-heap, used when
  /// `min_len() > max_len()`.
  pub fn transfer_min_root_to_max(&mut self, arena: &mut [HeapNode]) {
    let root = self.min_pop_root(arena);
    self.max_push(arena, root);
    self.swap_roots_and_rebalance(arena);
  }

  /// Re-establishes `max_len - min_len in {0, 1}` after an insertion or
  /// removal changed the balance by at most one slot.
  pub fn rebalance_sizes(&mut self, arena: &mut [HeapNode]) {
    if self.max_len() > self.min_len() + 1 {
      self.transfer_max_root_to_min(arena);
    } else if self.min_len() > self.max_len() {
      self.transfer_min_root_to_max(arena);
    }
  }

  #[cfg(test)]
  pub fn assert_invariants(&self, arena: &[HeapNode]) {
    for (i, &idx) in self.max_heap.iter().enumerate() {
      assert_eq!(arena[idx].heap_position, i, "max-heap position desync at {i}");
    }
    for (i, &idx) in self.min_heap.iter().enumerate() {
      assert_eq!(arena[idx].heap_position, i, "min-heap position desync at {i}");
    }
    for &idx in &self.max_heap {
      let position = arena[idx].heap_position;
      if position > 0 {
        let parent = self.max_heap[parent_of(position)];
        assert!(arena[parent].value >= arena[idx].value, "max-heap order violated");
      }
    }
    for &idx in &self.min_heap {
      let position = arena[idx].heap_position;
      if position > 0 {
        let parent = self.min_heap[parent_of(position)];
        assert!(arena[parent].value <= arena[idx].value, "min-heap order violated");
      }
    }
    if !self.max_heap.is_empty() && !self.min_heap.is_empty() {
      assert!(arena[self.max_heap[0]].value <= arena[self.min_heap[0]].value);
    }
    let diff = self.max_len() as i64 - self.min_len() as i64;
    assert!(diff == 0 || diff == 1, "heap size imbalance: {diff}");
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn arena_from(values: &[f64]) -> Vec<HeapNode> {
    values.iter().map(|&v| HeapNode::new(v)).collect()
  }

  #[test]
  fn child_count_matches_eight_ary_shape() {
    assert_eq!(child_count(0, 0), 0);
    assert_eq!(child_count(1, 0), 0);
    assert_eq!(child_count(9, 0), 8);
    assert_eq!(child_count(5, 0), 4);
  }

  #[test]
  fn push_and_pop_maintain_heap_order() {
    let mut arena = arena_from(&[5.0, 3.0, 8.0, 1.0, 9.0, 2.0]);
    let mut heap = DualHeap::with_capacity(6);
    for i in 0..arena.len() {
      heap.max_push(&mut arena, i);
    }
    heap.assert_invariants(&arena);
    assert_eq!(arena[heap.max_heap[0]].value, 9.0);
  }

  #[test]
  fn remove_restores_heap_order() {
    let mut arena = arena_from(&[5.0, 3.0, 8.0, 1.0, 9.0, 2.0, 7.0, 6.0, 4.0]);
    let mut heap = DualHeap::with_capacity(9);
    for i in 0..arena.len() {
      heap.max_push(&mut arena, i);
    }
    heap.max_remove(&mut arena, 2); // remove the 8.0 node
    heap.assert_invariants(&arena);
    assert_eq!(heap.max_len(), 8);
    assert!(heap.max_heap.iter().all(|&i| i != 2));
  }
}
