use metaviu_core::{ContentType, FaceLayout};
use metaviu_scene::{EntityId, Mesh, PbrMaterial, SceneHost, Texture, Transform, VideoPlayer};

/// Create one display face under `parent`.
///
/// The face is a plane placed by `face`. Video content gets a playing
/// [`VideoPlayer`] on the face itself, sampled by the face's own material;
/// anything else becomes an image texture. URLs are passed through untouched.
pub fn create_monitor(
    host: &dyn SceneHost,
    parent: EntityId,
    face: &FaceLayout,
    content_type: ContentType,
    url: &str,
) -> EntityId {
    let monitor = host.add_entity();
    host.set_mesh(monitor, Mesh::Plane);
    host.set_transform(
        monitor,
        Transform::new(face.position)
            .with_scale(face.size)
            .with_rotation(face.rotation())
            .with_parent(parent),
    );

    let texture = if content_type.is_video() {
        host.set_video_player(monitor, VideoPlayer::playing(url));
        Texture::Video {
            video_player_entity: monitor,
        }
    } else {
        Texture::Image {
            src: url.to_string(),
        }
    };
    host.set_material(monitor, PbrMaterial::matte(texture));

    monitor
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaviu_core::{layout, BillboardType};
    use metaviu_scene::HeadlessScene;

    #[test]
    fn image_monitor_binds_static_texture() {
        let scene = HeadlessScene::new();
        let frame = scene.add_entity();
        let face = layout(BillboardType::Triple).faces[2];

        let monitor = create_monitor(&scene, frame, &face, ContentType::Image, "https://cdn/a.png");
        let record = scene.entity(monitor).expect("monitor exists");

        assert_eq!(record.mesh, Some(Mesh::Plane));
        assert_eq!(record.video, None);
        let transform = record.transform.expect("placed");
        assert_eq!(transform.parent, Some(frame));
        assert_eq!(transform.position, face.position);
        assert_eq!(transform.scale, face.size);
        assert_eq!(transform.rotation, face.rotation());
        assert_eq!(
            record.material,
            Some(PbrMaterial::matte(Texture::Image {
                src: "https://cdn/a.png".into()
            }))
        );
    }

    #[test]
    fn video_monitor_plays_on_its_own_texture() {
        let scene = HeadlessScene::new();
        let frame = scene.add_entity();
        let face = layout(BillboardType::Double).faces[0];

        let monitor = create_monitor(&scene, frame, &face, ContentType::Video, "https://cdn/a.mp4");
        let record = scene.entity(monitor).expect("monitor exists");

        assert_eq!(record.video, Some(VideoPlayer::playing("https://cdn/a.mp4")));
        let material = record.material.expect("material bound");
        assert_eq!(
            material.texture,
            Texture::Video {
                video_player_entity: monitor
            }
        );
        assert_eq!(material.roughness, 1.0);
        assert_eq!(material.specular_intensity, 0.0);
        assert_eq!(material.metallic, 0.0);
    }

    #[test]
    fn malformed_url_is_passed_through() {
        let scene = HeadlessScene::new();
        let frame = scene.add_entity();
        let face = layout(BillboardType::Panel).faces[1];

        let monitor = create_monitor(&scene, frame, &face, ContentType::Image, "not a url");
        let material = scene.entity(monitor).and_then(|r| r.material).expect("material");
        assert_eq!(material.texture, Texture::Image { src: "not a url".into() });
    }
}
