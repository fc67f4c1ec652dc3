/// An inclusive `[start, end]` range of values, used for calibration and motion limits.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Range<T> {
    pub start: T,
    pub end: T,
}

impl<T: Copy> From<[T; 2]> for Range<T> {
    fn from(value: [T; 2]) -> Self {
        Self {
            start: value[0],
            end: value[1],
        }
    }
}

impl<T: Copy + PartialOrd> Range<T> {
    /// Returns the same range rearranged so that `start <= end`.
    pub fn ordered(self) -> Self {
        match self.start <= self.end {
            true => self,
            false => Self {
                start: self.end,
                end: self.start,
            },
        }
    }

    /// Clamps `value` inside the range (the range is expected ordered).
    pub fn clamp(&self, value: T) -> T {
        if value < self.start {
            self.start
        } else if value > self.end {
            self.end
        } else {
            value
        }
    }

    /// Returns this range restricted to fit within `bounds`.
    pub fn within(self, bounds: Range<T>) -> Self {
        Self {
            start: bounds.clamp(self.start),
            end: bounds.clamp(self.end),
        }
    }
}

#[cfg(feature = "serde")]
impl<T> serde::Serialize for Range<T>
where
    T: serde::Serialize + Copy,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Serialize the Range as an array [start, end]
        [self.start, self.end].serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for Range<T>
where
    T: serde::Deserialize<'de> + Copy,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let array: [T; 2] = serde::Deserialize::deserialize(deserializer)?;
        Ok(Self::from(array))
    }
}
