use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt::{Display, LowerExp};
use std::ops::{Add, Sub, AddAssign, SubAssign};
use num_traits::{Float, Zero, One};
use blocklin_core::LinAlgEx;

//

/// Block vector
///
/// Dense vector segments keyed by block names.
/// Keys iterate in their canonical (sorted) order.
#[derive(Debug, Clone)]
pub struct BlockVector<L: LinAlgEx>
{
    data: BTreeMap<String, Vec<L::F>>,
}

impl<L: LinAlgEx> BlockVector<L>
{
    /// Creates an empty instance.
    pub fn new() -> Self
    {
        BlockVector {
            data: BTreeMap::new(),
        }
    }

    /// Inserts a segment, or adds it elementwise to the existing one of the same key.
    ///
    /// * `key` is a block name.
    /// * `value` is a segment, whose length shall be the same as the existing one.
    pub fn insert_or_add(&mut self, key: &str, value: Vec<L::F>)
    {
        match self.data.get_mut(key) {
            Some(v) => {
                assert_eq!(v.len(), value.len(), "adding {} elements to {} of {}", value.len(), key, v.len());
                L::add(L::F::one(), &value, v);
            },
            None => {
                self.data.insert(key.to_string(), value);
            },
        }
    }

    /// Builder pattern of [`BlockVector::insert_or_add`].
    pub fn with(mut self, key: &str, value: Vec<L::F>) -> Self
    {
        self.insert_or_add(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&[L::F]>
    {
        self.data.get(key).map(|v| v.as_slice())
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut [L::F]>
    {
        self.data.get_mut(key).map(|v| v.as_mut_slice())
    }

    pub fn has_key(&self, key: &str) -> bool
    {
        self.data.contains_key(key)
    }

    /// Removes a segment.
    ///
    /// Returns the removed segment if it existed.
    pub fn remove(&mut self, key: &str) -> Option<Vec<L::F>>
    {
        self.data.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item=&str>
    {
        self.data.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<L::F>>
    {
        self.data.iter()
    }

    pub fn len(&self) -> usize
    {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.data.is_empty()
    }

    /// Total number of elements over all segments.
    pub fn dim(&self) -> usize
    {
        self.data.values().map(|v| v.len()).sum()
    }

    /// Euclidean norm over all segments.
    pub fn norm(&self) -> L::F
    {
        let sq = self.data.values()
            .fold(L::F::zero(), |acc, v| acc + L::dot(v, v));
        sq.sqrt()
    }

    /// Inner product.
    ///
    /// Segments missing on either side count as zeros.
    pub fn dot(&self, rhs: &Self) -> L::F
    {
        self.data.iter()
            .filter_map(|(k, u)| rhs.data.get(k).map(|v| L::dot(u, v)))
            .fold(L::F::zero(), |acc, d| acc + d)
    }

    /// Vector scaled by \\(\alpha\\).
    pub fn scale(&self, alpha: L::F) -> Self
    {
        let mut c = self.clone();
        for v in c.data.values_mut() {
            L::scale(alpha, v);
        }
        c
    }

    fn accumulate(&mut self, alpha: L::F, rhs: &Self)
    {
        for (k, v) in rhs.data.iter() {
            match self.data.get_mut(k) {
                Some(u) => {
                    assert_eq!(u.len(), v.len(), "adding {} elements to {} of {}", v.len(), k, u.len());
                    L::add(alpha, v, u);
                },
                None => {
                    let mut u = v.clone();
                    L::scale(alpha, &mut u);
                    self.data.insert(k.clone(), u);
                },
            }
        }
    }
}

impl<L: LinAlgEx> Default for BlockVector<L>
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl<L: LinAlgEx, S: Into<String>> FromIterator<(S, Vec<L::F>)> for BlockVector<L>
{
    fn from_iter<T: IntoIterator<Item=(S, Vec<L::F>)>>(iter: T) -> Self
    {
        let mut c = BlockVector::new();
        for (k, v) in iter {
            let k: String = k.into();
            c.insert_or_add(&k, v);
        }
        c
    }
}

//

impl<L: LinAlgEx> PartialEq for BlockVector<L>
{
    fn eq(&self, other: &Self) -> bool
    {
        self.data == other.data
    }
}

impl<L: LinAlgEx> AddAssign<&BlockVector<L>> for BlockVector<L>
{
    fn add_assign(&mut self, rhs: &BlockVector<L>)
    {
        self.accumulate(L::F::one(), rhs);
    }
}

impl<L: LinAlgEx> SubAssign<&BlockVector<L>> for BlockVector<L>
{
    fn sub_assign(&mut self, rhs: &BlockVector<L>)
    {
        self.accumulate(-L::F::one(), rhs);
    }
}

impl<'a, L: LinAlgEx> Add for &'a BlockVector<L>
{
    type Output = BlockVector<L>;

    fn add(self, rhs: Self) -> BlockVector<L>
    {
        let mut c = self.clone();
        c += rhs;
        c
    }
}

impl<'a, L: LinAlgEx> Sub for &'a BlockVector<L>
{
    type Output = BlockVector<L>;

    fn sub(self, rhs: Self) -> BlockVector<L>
    {
        let mut c = self.clone();
        c -= rhs;
        c
    }
}

//

impl<L: LinAlgEx> Display for BlockVector<L>
where L::F: Float + LowerExp
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error>
    {
        write!(f, "block vector {}", self.dim())?;
        for (k, v) in self.data.iter() {
            writeln!(f)?;
            write!(f, "{}: [", k)?;
            for e in v.iter() {
                write!(f, " {:.3e}", e)?;
            }
            write!(f, " ]")?;
        }
        Ok(())
    }
}

//

#[test]
fn test_block_vector1()
{
    use float_eq::assert_float_eq;
    use blocklin_core::FloatGeneric;

    type L = FloatGeneric<f64>;
    type BV = BlockVector<L>;

    let mut u = BV::new();
    u.insert_or_add("x", vec![1., 2.]);
    u.insert_or_add("x", vec![0.5, -1.]);
    assert_eq!(u, BV::new().with("x", vec![1.5, 1.]));

    let w: BV = [("y", vec![3.]), ("x", vec![1., 1.])].into_iter().collect();
    assert_eq!(w.keys().collect::<Vec<_>>(), vec!["x", "y"]);
    assert_eq!(w.dim(), 3);

    let s = &u + &w;
    assert_eq!(s.get("x"), Some(&[2.5, 2.][..]));
    assert_eq!(s.get("y"), Some(&[3.][..]));

    let d = &u - &w;
    assert_eq!(d.get("y"), Some(&[-3.][..]));

    assert_float_eq!(u.dot(&w), 2.5, abs <= 1e-12);
    assert_float_eq!(w.norm(), 11_f64.sqrt(), abs <= 1e-12);
    assert_eq!(w.scale(2.).get("y"), Some(&[6.][..]));

    let mut r = w.clone();
    assert_eq!(r.remove("y"), Some(vec![3.]));
    assert!(!r.has_key("y"));
    assert_eq!(r.remove("y"), None);

    let mut g = w.clone();
    if let Some(x) = g.get_mut("x") {
        x[1] = -1.;
    }
    assert!(g.get_mut("z").is_none());
    assert_eq!(g.get("x"), Some(&[1., -1.][..]));
    assert_eq!(g.to_string(), "block vector 3\nx: [ 1.000e0 -1.000e0 ]\ny: [ 3.000e0 ]");
}

#[test]
#[should_panic]
fn test_block_vector_len_mismatch()
{
    use blocklin_core::FloatGeneric;

    let mut u = BlockVector::<FloatGeneric<f64>>::new();
    u.insert_or_add("x", vec![1., 2.]);
    u.insert_or_add("x", vec![1.]);
}
