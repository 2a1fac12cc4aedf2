// shader_lib.rs - built-in templates and include chunks

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Template pair for a material kind, before include resolution.
#[derive(Debug, Clone, Copy)]
pub struct ShaderTemplate {
    pub name: &'static str,
    pub vertex: &'static str,
    pub fragment: &'static str,
}

pub const MESH_PHYSICAL: ShaderTemplate = ShaderTemplate {
    name: "MeshPhysicalMaterial",
    vertex: MESH_PHYSICAL_VERT,
    fragment: MESH_PHYSICAL_FRAG,
};

const MESH_PHYSICAL_VERT: &str = "#define PHYSICAL

out vec3 vViewPosition;

#include <common>
#include <uv_pars_vertex>
#include <normal_pars_vertex>

void main() {
	#include <uv_vertex>
	#include <beginnormal_vertex>
	#include <defaultnormal_vertex>
	#include <normal_vertex>
	#include <begin_vertex>
	#include <project_vertex>
	vViewPosition = - mvPosition.xyz;
	#include <worldpos_vertex>
}
";

const MESH_PHYSICAL_FRAG: &str = "#define PHYSICAL

uniform vec3 diffuse;
uniform float roughness;
uniform float metalness;
uniform float opacity;

in vec3 vViewPosition;

#include <common>
#include <uv_pars_fragment>
#include <normal_pars_fragment>
#include <lights_pars_begin>
#include <bsdfs>
#include <lights_physical_pars_fragment>

void main() {
	vec4 diffuseColor = vec4( diffuse, opacity );
	#include <normal_fragment_begin>
	#include <lights_physical_fragment>
	#include <lights_fragment_begin>
	vec3 outgoingLight = reflectedLight.directDiffuse + reflectedLight.directSpecular + reflectedLight.indirectDiffuse;
	#include <opaque_fragment>
	#include <colorspace_fragment>
}
";

static CHUNKS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            "common",
            "#define PI 3.141592653589793
#define RECIPROCAL_PI 0.3183098861837907
#define saturate( a ) clamp( a, 0.0, 1.0 )
float pow2( const in float x ) { return x * x; }
vec3 inverseTransformDirection( in vec3 dir, in mat4 matrix ) {
	return normalize( ( vec4( dir, 0.0 ) * matrix ).xyz );
}",
        ),
        ("uv_pars_vertex", "out vec2 vUv;"),
        ("uv_pars_fragment", "in vec2 vUv;"),
        ("uv_vertex", "vUv = uv;"),
        ("normal_pars_vertex", "out vec3 vNormal;"),
        ("normal_pars_fragment", "in vec3 vNormal;"),
        ("beginnormal_vertex", "vec3 objectNormal = vec3( normal );"),
        (
            "defaultnormal_vertex",
            "vec3 transformedNormal = normalMatrix * objectNormal;",
        ),
        ("normal_vertex", "vNormal = normalize( transformedNormal );"),
        ("begin_vertex", "vec3 transformed = vec3( position );"),
        (
            "project_vertex",
            "vec4 mvPosition = vec4( transformed, 1.0 );
mvPosition = modelViewMatrix * mvPosition;
gl_Position = projectionMatrix * mvPosition;",
        ),
        (
            "worldpos_vertex",
            "vec4 worldPosition = modelMatrix * vec4( transformed, 1.0 );",
        ),
        (
            "lights_pars_begin",
            "uniform vec3 ambientLightColor;
struct PointLight {
	vec3 position;
	vec3 color;
	float distance;
	float decay;
};
uniform PointLight pointLight;",
        ),
        (
            "bsdfs",
            "vec3 BRDF_Lambert( const in vec3 diffuseColor ) {
	return RECIPROCAL_PI * diffuseColor;
}
vec3 F_Schlick( const in vec3 f0, const in float dotVH ) {
	float fresnel = exp2( ( - 5.55473 * dotVH - 6.98316 ) * dotVH );
	return f0 * ( 1.0 - fresnel ) + fresnel;
}
float D_GGX( const in float alpha, const in float dotNH ) {
	float a2 = pow2( alpha );
	float denom = pow2( dotNH ) * ( a2 - 1.0 ) + 1.0;
	return RECIPROCAL_PI * a2 / pow2( denom );
}",
        ),
        (
            "lights_physical_pars_fragment",
            "struct PhysicalMaterial {
	vec3 diffuseColor;
	float roughness;
	vec3 specularColor;
};
struct ReflectedLight {
	vec3 directDiffuse;
	vec3 directSpecular;
	vec3 indirectDiffuse;
};
vec3 BRDF_GGX( const in vec3 lightDir, const in vec3 viewDir, const in vec3 normal, const in PhysicalMaterial material ) {
	vec3 halfDir = normalize( lightDir + viewDir );
	float dotNH = saturate( dot( normal, halfDir ) );
	float dotVH = saturate( dot( viewDir, halfDir ) );
	float alpha = pow2( material.roughness );
	vec3 F = F_Schlick( material.specularColor, dotVH );
	float D = D_GGX( alpha, dotNH );
	return F * ( 0.25 * D );
}",
        ),
        (
            "normal_fragment_begin",
            "vec3 normal = normalize( vNormal );
vec3 geometryNormal = normal;",
        ),
        (
            "lights_physical_fragment",
            "PhysicalMaterial material;
material.diffuseColor = diffuseColor.rgb * ( 1.0 - metalness );
material.roughness = clamp( roughness, 0.0525, 1.0 );
material.specularColor = mix( vec3( 0.04 ), diffuseColor.rgb, metalness );",
        ),
        (
            "lights_fragment_begin",
            "ReflectedLight reflectedLight = ReflectedLight( vec3( 0.0 ), vec3( 0.0 ), vec3( 0.0 ) );
vec3 viewDir = normalize( vViewPosition );
vec3 lVector = pointLight.position + vViewPosition;
vec3 lightDir = normalize( lVector );
float lightDistance = length( lVector );
float attenuation = pointLight.distance > 0.0 ? pow( saturate( 1.0 - lightDistance / pointLight.distance ), pointLight.decay ) : 1.0;
float dotNL = saturate( dot( geometryNormal, lightDir ) );
vec3 irradiance = dotNL * pointLight.color * attenuation;
reflectedLight.directDiffuse += irradiance * BRDF_Lambert( material.diffuseColor );
reflectedLight.directSpecular += irradiance * BRDF_GGX( lightDir, viewDir, normal, material );
reflectedLight.indirectDiffuse += ambientLightColor * BRDF_Lambert( material.diffuseColor );",
        ),
        (
            "opaque_fragment",
            "fragColor = vec4( outgoingLight, diffuseColor.a );",
        ),
        (
            "colorspace_fragment",
            "fragColor.rgb = pow( fragColor.rgb, vec3( 1.0 / 2.2 ) );",
        ),
    ])
});

/// Looks up a chunk by the name used inside `#include <name>`.
pub fn chunk(name: &str) -> Option<&'static str> {
    CHUNKS.get(name).copied()
}

/// All chunk names, sorted.
pub fn chunk_names() -> Vec<&'static str> {
    let mut names: Vec<_> = CHUNKS.keys().copied().collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn included_names(source: &str) -> Vec<&str> {
        source
            .lines()
            .filter_map(|line| line.trim().strip_prefix("#include <"))
            .filter_map(|rest| rest.strip_suffix('>'))
            .collect()
    }

    #[test]
    fn test_every_template_include_has_a_chunk() {
        let names = included_names(MESH_PHYSICAL.vertex)
            .into_iter()
            .chain(included_names(MESH_PHYSICAL.fragment));

        for name in names {
            assert!(chunk(name).is_some(), "missing chunk {name}");
        }
    }

    #[test]
    fn test_fragment_template_includes_common() {
        assert!(MESH_PHYSICAL.fragment.contains("#include <common>"));
        assert!(chunk_names().contains(&"common"));
    }

    #[test]
    fn test_chunks_do_not_include_further() {
        for name in chunk_names() {
            assert!(!chunk(name).unwrap().contains("#include"));
        }
    }
}
