//! Arena-based minimum-cost flow, solved by successive shortest paths.
//!
//! Nodes and arcs live in flat `Vec`s; arc `2i` and `2i + 1` are a forward/residual pair. The
//! solver reuses its scratch buffers across augmentations, so the inner loop does not
//! allocate. Arc visitation follows insertion order, which makes the chosen optimum (and
//! therefore the decoded bend placement) reproducible.

const INF_CAP: i64 = i64::MAX / 4;

#[derive(Debug, Clone, Copy)]
struct Arc {
    to: u32,
    /// Residual capacity.
    cap: i64,
    cost: i64,
}

#[derive(Debug, Clone, Default)]
pub struct FlowNet {
    excess: Vec<i64>,
    arcs: Vec<Arc>,
    out: Vec<Vec<u32>>,

    // Scratch reused by every shortest-path pass.
    dist: Vec<i64>,
    pred: Vec<u32>,
    in_queue: Vec<bool>,
    queue: Vec<u32>,
}

impl FlowNet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self) -> u32 {
        let n = self.out.len() as u32;
        self.out.push(Vec::new());
        self.excess.push(0);
        n
    }

    /// Positive for supply, negative for demand.
    pub fn add_excess(&mut self, node: u32, amount: i64) {
        self.excess[node as usize] += amount;
    }

    /// Adds a forward arc with the given residual capacity and unit cost, plus its zero-cap
    /// reverse. Returns the forward arc id.
    pub fn add_arc(&mut self, from: u32, to: u32, cap: i64, cost: i64) -> u32 {
        let id = self.arcs.len() as u32;
        self.arcs.push(Arc { to, cap, cost });
        self.arcs.push(Arc {
            to: from,
            cap: 0,
            cost: -cost,
        });
        self.out[from as usize].push(id);
        self.out[to as usize].push(id + 1);
        id
    }

    pub fn unbounded_cap() -> i64 {
        INF_CAP
    }

    /// Units pushed through the forward arc `id`.
    pub fn flow(&self, id: u32) -> i64 {
        self.arcs[(id ^ 1) as usize].cap
    }

    /// Drives every excess to zero, returning the total cost, or `None` when some excess
    /// cannot reach a deficit (the instance is infeasible).
    pub fn solve(&mut self) -> Option<i64> {
        debug_assert_eq!(self.excess.iter().sum::<i64>(), 0);
        let mut total_cost = 0i64;
        loop {
            let Some(source) = (0..self.excess.len()).find(|&n| self.excess[n] > 0) else {
                return Some(total_cost);
            };
            let target = self.shortest_path(source as u32)?;

            // Bottleneck along the predecessor chain.
            let mut push = self.excess[source].min(-self.excess[target as usize]);
            let mut n = target;
            while n != source as u32 {
                let a = self.pred[n as usize];
                push = push.min(self.arcs[a as usize].cap);
                n = self.arcs[(a ^ 1) as usize].to;
            }

            let mut n = target;
            while n != source as u32 {
                let a = self.pred[n as usize];
                self.arcs[a as usize].cap -= push;
                self.arcs[(a ^ 1) as usize].cap += push;
                total_cost += push * self.arcs[a as usize].cost;
                n = self.arcs[(a ^ 1) as usize].to;
            }
            self.excess[source] -= push;
            self.excess[target as usize] += push;
        }
    }

    /// SPFA from `source`; residual arcs may carry negative reduced costs but no negative
    /// cycle exists while augmenting along shortest paths. Returns the nearest deficit node
    /// (ties to the lowest index).
    fn shortest_path(&mut self, source: u32) -> Option<u32> {
        let n = self.out.len();
        self.dist.clear();
        self.dist.resize(n, i64::MAX);
        self.pred.clear();
        self.pred.resize(n, u32::MAX);
        self.in_queue.clear();
        self.in_queue.resize(n, false);
        self.queue.clear();

        self.dist[source as usize] = 0;
        self.queue.push(source);
        self.in_queue[source as usize] = true;
        let mut head = 0;
        while head < self.queue.len() {
            let v = self.queue[head];
            head += 1;
            self.in_queue[v as usize] = false;
            let dv = self.dist[v as usize];
            if dv == i64::MAX {
                continue;
            }
            for i in 0..self.out[v as usize].len() {
                let a = self.out[v as usize][i];
                let arc = self.arcs[a as usize];
                if arc.cap <= 0 {
                    continue;
                }
                let nd = dv + arc.cost;
                if nd < self.dist[arc.to as usize] {
                    self.dist[arc.to as usize] = nd;
                    self.pred[arc.to as usize] = a;
                    if !self.in_queue[arc.to as usize] {
                        self.queue.push(arc.to);
                        self.in_queue[arc.to as usize] = true;
                    }
                }
            }
        }

        let mut best: Option<u32> = None;
        for v in 0..n as u32 {
            if self.excess[v as usize] >= 0 || self.dist[v as usize] == i64::MAX {
                continue;
            }
            match best {
                Some(b) if self.dist[b as usize] <= self.dist[v as usize] => {}
                _ => best = Some(v),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_flow_along_the_cheaper_path() {
        let mut net = FlowNet::new();
        let s = net.add_node();
        let a = net.add_node();
        let b = net.add_node();
        let t = net.add_node();
        net.add_excess(s, 2);
        net.add_excess(t, -2);
        let sa = net.add_arc(s, a, 2, 1);
        let sb = net.add_arc(s, b, 2, 3);
        let at = net.add_arc(a, t, 1, 0);
        let bt = net.add_arc(b, t, 2, 0);
        let cost = net.solve().unwrap();
        assert_eq!(cost, 1 + 3);
        assert_eq!(net.flow(sa), 1);
        assert_eq!(net.flow(at), 1);
        assert_eq!(net.flow(sb), 1);
        assert_eq!(net.flow(bt), 1);
    }

    #[test]
    fn reports_infeasible_when_a_deficit_is_unreachable() {
        let mut net = FlowNet::new();
        let s = net.add_node();
        let t = net.add_node();
        net.add_excess(s, 1);
        net.add_excess(t, -1);
        assert_eq!(net.solve(), None);
    }
}
