use glam::{Mat4, Vec3, Vec4};

/// Unit look direction for yaw/pitch in degrees.
///
/// Yaw 0° looks down +X; yaw -90° looks down -Z.
pub fn direction_from_angles(yaw: f32, pitch: f32) -> Vec3 {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}

/// Right-handed look-at view matrix, column-major.
///
/// Builds the camera basis explicitly; the last column holds the basis
/// projected onto the eye. Same arithmetic as [`Mat4::look_at_rh`], so a
/// `Vec3::Y` up gives identical bits, up to the sign of zero entries.
/// `position == target` or `world_up` parallel to the view direction has no
/// basis and yields non-finite entries.
pub fn look_at(position: Vec3, target: Vec3, world_up: Vec3) -> Mat4 {
    let z_axis = (position - target).normalize();
    let x_axis = world_up.normalize().cross(z_axis).normalize();
    let y_axis = z_axis.cross(x_axis);

    // Basis vectors are the rows of the rotation.
    Mat4::from_cols(
        Vec4::new(x_axis.x, y_axis.x, z_axis.x, 0.0),
        Vec4::new(x_axis.y, y_axis.y, z_axis.y, 0.0),
        Vec4::new(x_axis.z, y_axis.z, z_axis.z, 0.0),
        Vec4::new(
            -x_axis.dot(position),
            -y_axis.dot(position),
            -z_axis.dot(position),
            1.0,
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn default_direction_looks_down_negative_z() {
        let dir = direction_from_angles(-90.0, 0.0);
        assert!(dir.abs_diff_eq(Vec3::NEG_Z, EPS));
    }

    #[test]
    fn pitch_up_raises_direction() {
        let dir = direction_from_angles(-90.0, 45.0);
        assert!(dir.y > 0.7);
        assert!(dir.is_normalized());
    }

    #[test]
    fn camera_at_z3_looking_at_origin() {
        let view = look_at(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y);
        let expected = Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0));
        assert!(view.abs_diff_eq(expected, EPS));
        assert!(view.w_axis.abs_diff_eq(Vec4::new(0.0, 0.0, -3.0, 1.0), EPS));
    }

    #[test]
    fn matches_glam_look_at_rh() {
        let cases = [
            (Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y),
            (Vec3::new(4.0, 2.0, -1.0), Vec3::new(0.5, -1.0, 2.0), Vec3::Y),
            (Vec3::new(-3.0, 7.0, 5.0), Vec3::new(1.0, 1.0, 1.0), Vec3::new(0.0, 2.0, 0.0)),
            (Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, -10.0), Vec3::new(0.1, 1.0, 0.0)),
        ];
        for (eye, target, up) in cases {
            let ours = look_at(eye, target, up);
            let reference = Mat4::look_at_rh(eye, target, up.normalize());
            assert!(
                ours.abs_diff_eq(reference, EPS),
                "eye={eye} target={target} up={up}\nours={ours}\nglam={reference}"
            );
        }
    }

    #[test]
    fn y_up_is_bit_identical_to_glam() {
        let cases = [
            (Vec3::new(1.0, 1.0, 1.0), Vec3::new(-2.0, 3.0, 0.5)),
            (Vec3::new(0.3, -1.7, 3.1), Vec3::new(2.9, 0.4, -5.3)),
            (Vec3::new(4.0, 2.0, -1.0), Vec3::new(0.5, -1.0, 2.0)),
            (Vec3::new(-12.5, 0.01, 7.75), Vec3::new(-12.0, 0.5, 7.0)),
        ];
        for (eye, target) in cases {
            let ours = look_at(eye, target, Vec3::Y).to_cols_array().map(f32::to_bits);
            let reference = Mat4::look_at_rh(eye, target, Vec3::Y)
                .to_cols_array()
                .map(f32::to_bits);
            assert_eq!(ours, reference, "eye={eye} target={target}");
        }
    }

    #[test]
    fn transforms_eye_to_origin_and_target_down_negative_z() {
        let eye = Vec3::new(2.0, 3.0, 4.0);
        let target = Vec3::new(-1.0, 0.0, 0.0);
        let view = look_at(eye, target, Vec3::Y);
        assert!(view.transform_point3(eye).abs_diff_eq(Vec3::ZERO, EPS));

        let t = view.transform_point3(target);
        assert!(t.x.abs() < EPS && t.y.abs() < EPS);
        assert!((t.z + (eye - target).length()).abs() < 1e-4);
    }

    #[test]
    fn degenerate_input_is_not_finite() {
        let view = look_at(Vec3::ONE, Vec3::ONE, Vec3::Y);
        assert!(!view.is_finite());
    }
}
