//! JSON 线格式封装
//!
//! 每个数据报承载一个 [`Envelope`]：
//!
//! ```text
//! {"topic": "/model/drone/pose", "type_name": "gz.msgs.Pose", "payload": {...}}
//! ```

use serde::{Deserialize, Serialize};

use crate::ProtocolError;
use crate::messages::Message;

/// 话题消息封装
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub topic: String,
    pub type_name: String,
    pub payload: serde_json::Value,
}

impl Envelope {
    /// 将消息封装到指定话题
    pub fn wrap<M: Message>(topic: &str, message: &M) -> Result<Self, ProtocolError> {
        Ok(Self {
            topic: topic.to_string(),
            type_name: M::TYPE_NAME.to_string(),
            payload: serde_json::to_value(message)?,
        })
    }

    /// 解出消息（检查类型名）
    pub fn open<M: Message>(&self) -> Result<M, ProtocolError> {
        if self.type_name != M::TYPE_NAME {
            return Err(ProtocolError::TypeMismatch {
                topic: self.topic.clone(),
                expected: M::TYPE_NAME,
                actual: self.type_name.clone(),
            });
        }
        Ok(M::deserialize(&self.payload)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        if bytes.is_empty() {
            return Err(ProtocolError::Empty);
        }
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{Pose, Twist, Vector3};
    use crate::topics::*;

    #[test]
    fn test_wrap_sets_topic_and_type() {
        let env = Envelope::wrap(SET_POSE_TOPIC, &Pose::from_xyz(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(env.topic, SET_POSE_TOPIC);
        assert_eq!(env.type_name, POSE_TYPE);
        assert_eq!(env.payload["position"]["z"], 3.0);
    }

    #[test]
    fn test_bytes_carry_pose() {
        let pose = Pose::from_xyz(-1.0, 4.5, 0.5);
        let bytes = Envelope::wrap(POSE_TOPIC, &pose).unwrap().to_bytes().unwrap();

        let env = Envelope::from_bytes(&bytes).unwrap();
        let decoded: Pose = env.open().unwrap();
        assert_eq!(decoded, pose);
    }

    #[test]
    fn test_open_rejects_wrong_type() {
        let twist = Twist {
            linear: Vector3::new(1.0, 0.0, 0.0),
            angular: Vector3::new(0.0, 0.0, 0.5),
        };
        let env = Envelope::wrap(CMD_VEL_TOPIC, &twist).unwrap();

        match env.open::<Pose>() {
            Err(ProtocolError::TypeMismatch {
                topic,
                expected,
                actual,
            }) => {
                assert_eq!(topic, CMD_VEL_TOPIC);
                assert_eq!(expected, POSE_TYPE);
                assert_eq!(actual, TWIST_TYPE);
            },
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_from_bytes_errors() {
        assert!(matches!(Envelope::from_bytes(&[]), Err(ProtocolError::Empty)));
        assert!(matches!(
            Envelope::from_bytes(b"not json"),
            Err(ProtocolError::Json(_))
        ));
    }

    #[test]
    fn test_error_display() {
        let err = ProtocolError::TypeMismatch {
            topic: "/t".to_string(),
            expected: POSE_TYPE,
            actual: "x".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/t") && msg.contains("gz.msgs.Pose"), "{}", msg);
    }
}
