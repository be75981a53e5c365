/// Asserts the RGBA value of a single texel.
#[macro_export]
macro_rules! assert_texel {
    ($map:expr, $x:expr, $y:expr, $state:expr) => {
        assert_eq!(
            $map.texel($x, $y),
            Some($state.rgba()),
            "Texel ({}, {}) should be {:?}",
            $x,
            $y,
            $state
        );
    };
}

/// Asserts every texel in `[x0, x1) x [y0, y1)` has the colour of `state`.
#[macro_export]
macro_rules! assert_block {
    ($map:expr, $xs:expr, $ys:expr, $state:expr) => {
        for y in $ys {
            for x in $xs.clone() {
                assert_eq!(
                    $map.texel(x, y),
                    Some($state.rgba()),
                    "Texel ({}, {}) should be {:?}",
                    x,
                    y,
                    $state
                );
            }
        }
    };
}
